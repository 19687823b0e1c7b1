// crates/scenegate-core/src/errors.rs
// ============================================================================
// Module: Error Taxonomy
// Description: Closed tool error codes and the uniform response envelope.
// Purpose: Represent every tool outcome as data with a stable wire shape.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every tool invocation yields a [`ToolEnvelope`]: `{ok: true, result}` on
//! success or `{ok: false, error: {code, message, details, hint, retryable}}`
//! on failure. Error codes form a closed set; `retryable` is informational
//! and nothing in the gateway retries automatically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeStruct;
use serde_json::Value;

// ============================================================================
// SECTION: Error Codes
// ============================================================================

/// Closed error taxonomy for tool responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No active session contract.
    ContractRequired,
    /// Contract allowlist excludes the tool.
    ToolNotAllowed,
    /// Contract lacks a capability the tool requires.
    CapabilityRequired,
    /// Runtime backend cannot serve the request.
    RuntimeUnavailable,
    /// Request was malformed or failed validation.
    InvalidRequest,
    /// Unexpected fault inside a handler.
    InternalError,
}

impl ErrorCode {
    /// Returns the canonical wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContractRequired => "contract_required",
            Self::ToolNotAllowed => "tool_not_allowed",
            Self::CapabilityRequired => "capability_required",
            Self::RuntimeUnavailable => "runtime_unavailable",
            Self::InvalidRequest => "invalid_request",
            Self::InternalError => "internal_error",
        }
    }

    /// Returns the informational retry hint for this code.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::RuntimeUnavailable)
    }

    /// Returns the default operator hint for this code.
    #[must_use]
    pub const fn default_hint(self) -> Option<&'static str> {
        match self {
            Self::ContractRequired => Some("Call contract.create before invoking this tool."),
            Self::ToolNotAllowed => Some("Add the tool to the contract tool_allowlist."),
            Self::CapabilityRequired => {
                Some("Create a contract that grants the required capabilities.")
            }
            Self::RuntimeUnavailable => {
                Some("Configure a runtime backend or select a runtime profile that provides one.")
            }
            Self::InvalidRequest | Self::InternalError => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Structured error payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    pub details: Option<Value>,
    /// Optional remediation hint.
    pub hint: Option<String>,
    /// Informational retry flag.
    pub retryable: bool,
}

impl ErrorBody {
    /// Builds an error body with the code's default hint and retry flag.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            hint: code.default_hint().map(str::to_string),
            retryable: code.is_retryable(),
        }
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Uniform tool response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEnvelope {
    /// Successful tool result.
    Ok(Value),
    /// Failed tool call.
    Err(ErrorBody),
}

impl ToolEnvelope {
    /// Builds a failure envelope from a code and message.
    #[must_use]
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Err(ErrorBody::new(code, message))
    }

    /// Returns true for successful envelopes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns the error code for failure envelopes.
    #[must_use]
    pub const fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Ok(_) => None,
            Self::Err(body) => Some(body.code),
        }
    }

    /// Serializes the envelope into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Ok(result) => serde_json::json!({ "ok": true, "result": result }),
            Self::Err(body) => serde_json::json!({ "ok": false, "error": body }),
        }
    }
}

impl Serialize for ToolEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ToolEnvelope", 2)?;
        match self {
            Self::Ok(result) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("result", result)?;
            }
            Self::Err(body) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", body)?;
            }
        }
        state.end()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
