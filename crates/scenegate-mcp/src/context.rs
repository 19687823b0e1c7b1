// crates/scenegate-mcp/src/context.rs
// ============================================================================
// Module: Request Context
// Description: Per-request metadata carried through tool dispatch.
// Purpose: Bind each call to a transport, a session key, and a request id.
// Dependencies: scenegate-config, scenegate-core
// ============================================================================

//! ## Overview
//! Every tool call runs against exactly one session. Stdio callers share the
//! `stdio` session; HTTP callers name theirs with the `x-scenegate-session`
//! header and fall back to `default`.

use scenegate_config::ServerTransport;
use scenegate_core::SessionKey;

/// Per-request context used for session routing and auditing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Transport used by the caller.
    pub transport: ServerTransport,
    /// Session the call runs against.
    pub session: SessionKey,
    /// Optional request identifier for auditing.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Builds a stdio request context.
    #[must_use]
    pub fn stdio() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            session: SessionKey::stdio(),
            request_id: None,
        }
    }

    /// Builds an HTTP request context for a session.
    #[must_use]
    pub const fn http(session: SessionKey) -> Self {
        Self {
            transport: ServerTransport::Http,
            session,
            request_id: None,
        }
    }

    /// Returns a copy with the request identifier set.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
