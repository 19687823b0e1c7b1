// crates/scenegate-mcp/src/lib.rs
// ============================================================================
// Module: Scene Gate MCP
// Description: Tool registry, gate-checked dispatcher, and transports.
// Purpose: Serve Scene Gate tools over stdio and HTTP.
// Dependencies: scenegate-core, scenegate-providers, scenegate-config, axum, tokio
// ============================================================================

//! ## Overview
//! Scene Gate MCP exposes the tool surface defined in `scenegate-contract`
//! through JSON-RPC and an HTTP facade. All tool calls pass through
//! [`tools::ToolRouter`], which snapshots the caller's session, evaluates
//! the gate, and wraps every outcome in the uniform envelope.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod context;
pub mod registry;
pub mod server;
pub mod tools;
pub mod workspace;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::ContractAuditEvent;
pub use audit::McpAuditSink;
pub use audit::McpFileAuditSink;
pub use audit::McpNoopAuditSink;
pub use audit::McpStderrAuditSink;
pub use audit::ToolCallAuditEvent;
pub use context::RequestContext;
pub use registry::RegistryError;
pub use registry::ToolRegistry;
pub use server::McpServer;
pub use server::McpServerError;
pub use server::build_router;
pub use server::http_app;
pub use tools::ToolError;
pub use tools::ToolRouter;
pub use tools::ToolRouterConfig;
