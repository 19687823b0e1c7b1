// crates/scenegate-contract/src/lib.rs
// ============================================================================
// Module: Scene Gate Contract Library
// Description: Canonical tool contracts for Scene Gate.
// Purpose: Provide the single source of truth for tool names, schemas, and gating.
// Dependencies: scenegate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The contract library defines the machine-readable tool surface of Scene
//! Gate. The MCP registry is built from [`tooling::tool_contracts`], and the
//! tools catalog, `tools/list`, and the CLI all render from the same data.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod tooling;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use tooling::tool_contracts;
pub use types::ToolContract;
pub use types::ToolDefinition;
pub use types::ToolExample;
pub use types::ToolName;
