// crates/scenegate-mcp/src/audit.rs
// ============================================================================
// Module: MCP Audit Logging
// Description: Structured audit events for tool dispatch and contract installs.
// Purpose: Emit JSON-line audit logs without hard dependencies.
// Dependencies: scenegate-config, scenegate-core, serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks. Events serialize to
//! one JSON object per line. The stderr sink keeps stdout free for the stdio
//! transport.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use scenegate_config::ServerTransport;
use scenegate_core::ErrorCode;
use scenegate_core::RuntimeKind;
use scenegate_core::SessionContract;
use scenegate_core::SessionKey;
use serde::Serialize;

use crate::context::RequestContext;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gate decision label recorded for a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditDecision {
    /// The gate allowed the call.
    Allow,
    /// The gate denied the call.
    Deny,
}

/// Tool call outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The envelope carried a result.
    Ok,
    /// The envelope carried an error.
    Error,
}

/// Audit record for one tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Session the call ran against.
    pub session: String,
    /// Requested tool name, verbatim.
    pub tool: String,
    /// Gate decision.
    pub decision: AuditDecision,
    /// Envelope outcome.
    pub outcome: AuditOutcome,
    /// Error code when the envelope failed.
    pub error_code: Option<ErrorCode>,
    /// Contract observed by the call.
    pub contract_id: Option<String>,
}

/// Parameters for [`ToolCallAuditEvent::new`].
#[derive(Debug, Clone)]
pub struct ToolCallAuditParams<'a> {
    /// Request context.
    pub context: &'a RequestContext,
    /// Requested tool name.
    pub tool: &'a str,
    /// Gate decision.
    pub decision: AuditDecision,
    /// Error code when the envelope failed.
    pub error_code: Option<ErrorCode>,
    /// Contract observed by the call.
    pub contract_id: Option<String>,
}

impl ToolCallAuditEvent {
    /// Builds a tool call audit event stamped with the current time.
    #[must_use]
    pub fn new(params: ToolCallAuditParams<'_>) -> Self {
        Self {
            event: "tool_call",
            timestamp_ms: timestamp_ms(),
            request_id: params.context.request_id.clone(),
            transport: params.context.transport,
            session: params.context.session.as_str().to_string(),
            tool: params.tool.to_string(),
            decision: params.decision,
            outcome: if params.error_code.is_some() {
                AuditOutcome::Error
            } else {
                AuditOutcome::Ok
            },
            error_code: params.error_code,
            contract_id: params.contract_id,
        }
    }
}

/// Audit record for a contract installation.
#[derive(Debug, Clone, Serialize)]
pub struct ContractAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Session receiving the contract.
    pub session: String,
    /// Installed contract identifier.
    pub contract_id: String,
    /// Host profile name.
    pub host_profile: String,
    /// Runtime profile name.
    pub runtime_profile: String,
    /// Granted capability tokens.
    pub capabilities: Vec<&'static str>,
    /// Runtime adapter kind active after installation.
    pub runtime: RuntimeKind,
    /// Session evicted to make room for this one, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evicted_session: Option<String>,
}

impl ContractAuditEvent {
    /// Builds a contract installation audit event.
    #[must_use]
    pub fn new(context: &RequestContext, contract: &SessionContract, runtime: RuntimeKind) -> Self {
        Self {
            event: "contract_installed",
            timestamp_ms: timestamp_ms(),
            request_id: context.request_id.clone(),
            session: context.session.as_str().to_string(),
            contract_id: contract.contract_id().as_str().to_string(),
            host_profile: contract.host_profile().to_string(),
            runtime_profile: contract.runtime_profile().to_string(),
            capabilities: contract.capabilities().tokens(),
            runtime,
            evicted_session: None,
        }
    }

    /// Records the session evicted by this installation.
    #[must_use]
    pub fn with_evicted(mut self, evicted: Option<&SessionKey>) -> Self {
        self.evicted_session = evicted.map(|key| key.as_str().to_string());
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for MCP events.
pub trait McpAuditSink: Send + Sync {
    /// Record a tool call audit event.
    fn record(&self, event: &ToolCallAuditEvent);

    /// Record a contract installation audit event.
    fn record_contract(&self, _event: &ContractAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct McpStderrAuditSink;

impl McpAuditSink for McpStderrAuditSink {
    fn record(&self, event: &ToolCallAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_contract(&self, event: &ContractAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct McpFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl McpFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized line.
    fn write_line(&self, payload: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl McpAuditSink for McpFileAuditSink {
    fn record(&self, event: &ToolCallAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.write_line(&payload);
        }
    }

    fn record_contract(&self, event: &ContractAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.write_line(&payload);
        }
    }
}

/// No-op audit sink.
pub struct McpNoopAuditSink;

impl McpAuditSink for McpNoopAuditSink {
    fn record(&self, _event: &ToolCallAuditEvent) {}

    fn record_contract(&self, _event: &ContractAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Milliseconds since the Unix epoch; zero if the clock is before it.
fn timestamp_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
