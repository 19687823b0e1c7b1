// crates/scenegate-contract/src/tooling/tests.rs
// ============================================================================
// Module: Tooling Schema Unit Tests
// Description: Validates tool examples against their JSON schemas.
// Purpose: Ensure contract examples are kept in sync with schema definitions.
// Dependencies: scenegate-contract, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Verifies that tool input/output examples satisfy their JSON schemas and
//! that gating metadata matches the core tool table.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only validation helpers use panic-based assertions for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use jsonschema::Draft;
use jsonschema::Validator;
use scenegate_core::ToolGating;
use serde_json::Value;
use serde_json::json;

use super::tool_contracts;
use crate::types::ToolDefinition;
use crate::types::ToolName;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn compile_schema(schema: &Value) -> Validator {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .expect("schema compilation failed")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn tool_examples_match_tool_schemas() {
    for contract in tool_contracts() {
        let input_schema = compile_schema(&contract.input_schema);
        let output_schema = compile_schema(&contract.output_schema);
        assert!(!contract.examples.is_empty(), "tool examples missing for {}", contract.name);
        for example in &contract.examples {
            assert!(
                input_schema.is_valid(&example.input),
                "input example failed for {}",
                contract.name
            );
            assert!(
                output_schema.is_valid(&example.output),
                "output example failed for {}",
                contract.name
            );
        }
    }
}

#[test]
fn tool_names_are_unique() {
    let contracts = tool_contracts();
    let names: BTreeSet<ToolName> = contracts.iter().map(|contract| contract.name).collect();
    assert_eq!(names.len(), contracts.len());
}

#[test]
fn runtime_tools_require_data_only() {
    for contract in tool_contracts() {
        if matches!(contract.name, ToolName::RuntimeProbe | ToolName::SceneListObjects) {
            assert_eq!(contract.gating, ToolGating::RUNTIME_DATA, "{}", contract.name);
        }
    }
}

#[test]
fn contract_create_rejects_unknown_fields_by_schema() {
    let contract = tool_contracts()
        .into_iter()
        .find(|contract| contract.name == ToolName::ContractCreate)
        .expect("contract.create missing");
    let schema = compile_schema(&contract.input_schema);
    assert!(!schema.is_valid(&json!({
        "host_profile": "codex_stdio",
        "runtime_profile": "none",
        "extra": true
    })));
    assert!(!schema.is_valid(&json!({ "host_profile": "codex_stdio" })));
}

#[test]
fn definitions_use_mcp_field_names() {
    let definitions: Vec<ToolDefinition> =
        tool_contracts().iter().map(ToolDefinition::from).collect();
    let value = serde_json::to_value(definitions).unwrap();
    let first = &value[0];
    assert_eq!(first["name"], "system.health");
    assert!(first.get("inputSchema").is_some());
}
