// crates/scenegate-core/src/lib.rs
// ============================================================================
// Module: Scene Gate Core Library
// Description: Public API surface for the Scene Gate core.
// Purpose: Expose contract, gate, runtime, and session types.
// Dependencies: crate::{capability, contract, errors, gate, identifiers, profiles, runtime, session, tooling}
// ============================================================================

//! ## Overview
//! Scene Gate core owns the session contract model, the capability
//! implication graph, the ordered gate evaluator, and the runtime adapter
//! interface. It has no transport or environment dependencies; the MCP layer
//! composes these pieces into a dispatcher and bootstrap code hands it
//! explicit configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod capability;
pub mod contract;
pub mod errors;
pub mod gate;
pub mod identifiers;
pub mod profiles;
pub mod runtime;
pub mod session;
pub mod tooling;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use capability::CAPABILITIES_VERSION;
pub use capability::CAPABILITY_IMPLICATIONS;
pub use capability::Capability;
pub use capability::CapabilityError;
pub use capability::CapabilitySet;
pub use capability::validate_capabilities;
pub use contract::CONTRACT_VERSION;
pub use contract::ContractError;
pub use contract::ContractRequest;
pub use contract::ContractView;
pub use contract::SessionContract;
pub use errors::ErrorBody;
pub use errors::ErrorCode;
pub use errors::ToolEnvelope;
pub use gate::ALWAYS_ALLOWED_TOOLS;
pub use gate::DenialReason;
pub use gate::GATE_SEQUENCE;
pub use gate::GateCheck;
pub use gate::GateDecision;
pub use gate::GateDenial;
pub use gate::GateRequest;
pub use gate::evaluate_gate;
pub use identifiers::ContractId;
pub use identifiers::SessionKey;
pub use identifiers::SessionKeyError;
pub use profiles::HostProfile;
pub use profiles::HostTransport;
pub use profiles::ResolvedProfiles;
pub use profiles::RuntimeMode;
pub use profiles::RuntimeProfile;
pub use runtime::FixtureRuntime;
pub use runtime::RuntimeAdapter;
pub use runtime::RuntimeError;
pub use runtime::RuntimeInfo;
pub use runtime::RuntimeKind;
pub use runtime::RuntimeSelection;
pub use runtime::SceneObject;
pub use runtime::SharedRuntime;
pub use runtime::UnavailableRuntime;
pub use session::InstallOutcome;
pub use session::SessionSnapshot;
pub use session::SessionStore;
pub use tooling::ToolGating;
pub use tooling::ToolName;
