// crates/scenegate-providers/src/lib.rs
// ============================================================================
// Module: Scene Gate Providers
// Description: Runtime adapter implementations and factory.
// Purpose: Provide the remote HTTP runtime adapter and selection-keyed construction.
// Dependencies: scenegate-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! This crate supplies the network-backed runtime adapter and the factory
//! that turns a [`scenegate_core::RuntimeSelection`] into a shared adapter
//! handle. The in-process adapters live in `scenegate-core`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod factory;
pub mod remote;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use factory::build_runtime;
pub use remote::RemoteRuntime;
pub use remote::RemoteRuntimeConfig;
pub use remote::RemoteRuntimeError;
