// crates/scenegate-core/src/gate.rs
// ============================================================================
// Module: Gate Evaluator
// Description: Ordered allow/deny decision for a single tool call.
// Purpose: Decide whether a tool may run given the session's contract and runtime.
// Dependencies: crate::{contract, errors, runtime, tooling}, serde_json
// ============================================================================

//! ## Overview
//! The gate is a pure function over the active contract, the tool name and
//! its gating metadata, and the active runtime kind. Always-allowed tools
//! short-circuit to allow. Every other call walks [`GATE_SEQUENCE`] in order
//! and the first failing check determines the error code.
//!
//! ## Invariants
//! - Order is fixed: contract, allowlist, capability, runtime.
//! - Evaluation has no side effects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

use crate::contract::SessionContract;
use crate::errors::ErrorBody;
use crate::errors::ErrorCode;
use crate::runtime::RuntimeKind;
use crate::tooling::ToolGating;
use crate::tooling::ToolName;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Tools that bypass every gate check.
pub const ALWAYS_ALLOWED_TOOLS: &[ToolName] = &[
    ToolName::SystemHealth,
    ToolName::Echo,
    ToolName::ContractCreate,
    ToolName::ContractGet,
    ToolName::ToolsCatalog,
];

/// Inputs to a gate decision.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    /// Requested tool name.
    pub tool: &'a str,
    /// Gating metadata for the tool.
    pub gating: ToolGating,
    /// Active session contract, if any.
    pub contract: Option<&'a SessionContract>,
    /// Kind of the active runtime adapter.
    pub runtime: RuntimeKind,
}

/// Reason a single gate check failed.
#[derive(Debug, Clone, PartialEq)]
pub struct DenialReason {
    /// Human-readable message.
    pub message: String,
    /// Structured details.
    pub details: Value,
}

/// Gate check: returns a reason when the request fails the check.
pub type GateCheck = fn(&GateRequest<'_>) -> Option<DenialReason>;

/// Ordered gate checks paired with the code each one denies with.
pub const GATE_SEQUENCE: &[(ErrorCode, GateCheck)] = &[
    (ErrorCode::ContractRequired, check_contract_present),
    (ErrorCode::ToolNotAllowed, check_allowlist),
    (ErrorCode::CapabilityRequired, check_capabilities),
    (ErrorCode::RuntimeUnavailable, check_runtime_live),
];

/// Denial produced by the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDenial {
    /// Error code of the failing check.
    pub code: ErrorCode,
    /// Failure reason.
    pub reason: DenialReason,
}

impl GateDenial {
    /// Converts the denial into an envelope error body.
    #[must_use]
    pub fn into_error_body(self) -> ErrorBody {
        ErrorBody::new(self.code, self.reason.message).with_details(self.reason.details)
    }
}

/// Gate decision.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// The tool may run.
    Allow,
    /// The tool must not run.
    Deny(GateDenial),
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates the gate for a single call.
#[must_use]
pub fn evaluate_gate(request: &GateRequest<'_>) -> GateDecision {
    if is_always_allowed(request.tool) {
        return GateDecision::Allow;
    }
    for (code, check) in GATE_SEQUENCE {
        if let Some(reason) = check(request) {
            return GateDecision::Deny(GateDenial {
                code: *code,
                reason,
            });
        }
    }
    GateDecision::Allow
}

/// Returns true for tools in [`ALWAYS_ALLOWED_TOOLS`].
#[must_use]
pub fn is_always_allowed(tool: &str) -> bool {
    ALWAYS_ALLOWED_TOOLS.iter().any(|allowed| allowed.as_str() == tool)
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Fails when no contract is active.
fn check_contract_present(request: &GateRequest<'_>) -> Option<DenialReason> {
    if request.contract.is_some() || !request.gating.requires_contract {
        return None;
    }
    Some(DenialReason {
        message: format!("Tool '{}' requires an active session contract.", request.tool),
        details: json!({ "tool": request.tool }),
    })
}

/// Fails when the contract allowlist excludes the tool.
fn check_allowlist(request: &GateRequest<'_>) -> Option<DenialReason> {
    let contract = request.contract?;
    if !request.gating.allowlist_respected || contract.allows(request.tool) {
        return None;
    }
    Some(DenialReason {
        message: format!("Tool '{}' is not in the contract tool_allowlist.", request.tool),
        details: json!({
            "tool": request.tool,
            "tool_allowlist": contract.tool_allowlist(),
        }),
    })
}

/// Fails when the contract lacks a required capability.
fn check_capabilities(request: &GateRequest<'_>) -> Option<DenialReason> {
    let contract = request.contract?;
    let missing = contract.capabilities().missing(request.gating.required_capabilities);
    if missing.is_empty() {
        return None;
    }
    let missing: Vec<&'static str> = missing.into_iter().map(|cap| cap.as_str()).collect();
    Some(DenialReason {
        message: format!("Tool '{}' requires capabilities: {}.", request.tool, missing.join(", ")),
        details: json!({
            "tool": request.tool,
            "required": request.gating.required_capabilities,
            "missing": missing,
        }),
    })
}

/// Fails when a runtime-backed tool has no live runtime.
fn check_runtime_live(request: &GateRequest<'_>) -> Option<DenialReason> {
    if !request.gating.runtime_backed || request.runtime != RuntimeKind::Unavailable {
        return None;
    }
    Some(DenialReason {
        message: "Runtime unavailable".to_string(),
        details: json!({
            "tool": request.tool,
            "runtime": request.runtime,
        }),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
