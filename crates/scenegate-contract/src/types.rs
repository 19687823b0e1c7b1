// crates/scenegate-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Shared data models for Scene Gate tool contracts.
// Purpose: Provide canonical shapes for tool listings and the tools catalog.
// Dependencies: scenegate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Typed contract shapes rendered by the tools catalog and MCP listings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use scenegate_core::ToolGating;
/// Canonical tool names for Scene Gate.
pub use scenegate_core::ToolName;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Tooling Contracts
// ============================================================================

/// Tool definition used by MCP tool listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl From<&ToolContract> for ToolDefinition {
    fn from(contract: &ToolContract) -> Self {
        Self {
            name: contract.name,
            description: contract.description.clone(),
            input_schema: contract.input_schema.clone(),
        }
    }
}

/// Tool contract with full request and response schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolContract {
    /// Tool name.
    pub name: ToolName,
    /// Tool description.
    pub description: String,
    /// JSON schema for tool input payload.
    pub input_schema: Value,
    /// JSON schema for the `result` member of a successful envelope.
    pub output_schema: Value,
    /// Gating metadata consulted by the gate evaluator.
    pub gating: ToolGating,
    /// Example payloads for documentation.
    pub examples: Vec<ToolExample>,
    /// Notes describing tool usage.
    pub notes: Vec<String>,
}

/// Tool example with input/output payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolExample {
    /// Short example description.
    pub description: String,
    /// Example input payload.
    pub input: Value,
    /// Example output payload.
    pub output: Value,
}
