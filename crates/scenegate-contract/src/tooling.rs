// crates/scenegate-contract/src/tooling.rs
// ============================================================================
// Module: Tool Contracts
// Description: Canonical tool definitions and schemas for Scene Gate.
// Purpose: Provide tool contracts for the registry, catalog, and MCP listing.
// Dependencies: scenegate-core, serde_json, crate::types
// ============================================================================

//! ## Overview
//! This module defines the canonical tool surface. Output schemas describe
//! the `result` member of a successful envelope; failures always use the
//! shared error envelope and are not repeated per tool.

// ============================================================================
// SECTION: Imports
// ============================================================================

use scenegate_core::CAPABILITIES_VERSION;
use scenegate_core::Capability;
use scenegate_core::FixtureRuntime;
use serde_json::Value;
use serde_json::json;

use crate::types::ToolContract;
use crate::types::ToolExample;
use crate::types::ToolName;

// ============================================================================
// SECTION: Tool Contracts
// ============================================================================

/// Returns the canonical tool contracts.
///
/// The order matches [`ToolName::all`]. Append new tools at the end.
#[must_use]
pub fn tool_contracts() -> Vec<ToolContract> {
    vec![
        system_health_contract(),
        echo_contract(),
        contract_create_contract(),
        contract_get_contract(),
        tools_catalog_contract(),
        workspace_list_files_contract(),
        runtime_probe_contract(),
        scene_list_objects_contract(),
    ]
}

/// Builds the tool contract for `system.health`.
fn system_health_contract() -> ToolContract {
    build_tool_contract(
        ToolName::SystemHealth,
        "Return basic health information for the gateway.",
        empty_input_schema(),
        tool_output_schema(
            &json!({
                "name": schema_string("Gateway name."),
                "version": schema_string("Gateway version."),
                "capabilities_version": schema_string("Capability token set version."),
                "runtime": runtime_kind_schema("Default runtime adapter kind.")
            }),
            &["name", "version", "capabilities_version", "runtime"],
        ),
        vec![ToolExample {
            description: "Health check against a gateway with the fixture runtime.".to_string(),
            input: json!({}),
            output: json!({
                "name": "scenegate",
                "version": "0.1.0",
                "capabilities_version": CAPABILITIES_VERSION,
                "runtime": "fixture"
            }),
        }],
        vec!["Always allowed; does not require a session contract.".to_string()],
    )
}

/// Builds the tool contract for `echo`.
fn echo_contract() -> ToolContract {
    build_tool_contract(
        ToolName::Echo,
        "Echo the provided text.",
        tool_input_schema(&json!({ "text": schema_string("Text to echo.") }), &["text"]),
        with_schema(json!({ "type": "string" })),
        vec![ToolExample {
            description: "Echo a greeting.".to_string(),
            input: json!({ "text": "hello" }),
            output: json!("hello"),
        }],
        vec!["Always allowed; useful as a connectivity check.".to_string()],
    )
}

/// Builds the tool contract for `contract.create`.
fn contract_create_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ContractCreate,
        "Create a session contract and install it as the active contract for the session.",
        tool_input_schema(
            &json!({
                "host_profile": schema_string("Host profile name."),
                "runtime_profile": schema_string("Runtime profile name."),
                "capabilities": {
                    "oneOf": [
                        { "type": "null" },
                        { "type": "array", "items": capability_schema() }
                    ],
                    "description": "Requested capability tokens."
                },
                "tool_allowlist": {
                    "oneOf": [
                        { "type": "null" },
                        { "type": "array", "items": { "type": "string" } }
                    ],
                    "description": "Tools the session may call; null means unrestricted."
                }
            }),
            &["host_profile", "runtime_profile"],
        ),
        with_schema(contract_view_schema()),
        vec![ToolExample {
            description: "Create a data-only contract limited to runtime tools.".to_string(),
            input: json!({
                "host_profile": "codex_stdio",
                "runtime_profile": "inmemory",
                "capabilities": ["DATA_ONLY"],
                "tool_allowlist": ["runtime.probe", "scene.list_objects"]
            }),
            output: example_contract_view(),
        }],
        vec![
            "Replaces any previously active contract for the session; nothing is merged."
                .to_string(),
            "UI_LIVE requires DATA_ONLY; unknown capability tokens are rejected.".to_string(),
            "Runtime profiles with a base address switch the session to the remote runtime."
                .to_string(),
            "Validation failures return invalid_request and leave the prior contract active."
                .to_string(),
        ],
    )
}

/// Builds the tool contract for `contract.get`.
fn contract_get_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ContractGet,
        "Return the active session contract, or null when none is installed.",
        empty_input_schema(),
        tool_output_schema(
            &json!({
                "contract": {
                    "oneOf": [{ "type": "null" }, contract_view_schema()]
                }
            }),
            &["contract"],
        ),
        vec![
            ToolExample {
                description: "No contract installed yet.".to_string(),
                input: json!({}),
                output: json!({ "contract": null }),
            },
            ToolExample {
                description: "Active contract present.".to_string(),
                input: json!({}),
                output: json!({ "contract": example_contract_view() }),
            },
        ],
        vec!["Always allowed; never fails.".to_string()],
    )
}

/// Builds the tool contract for `system.tools_catalog`.
fn tools_catalog_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ToolsCatalog,
        "List every registered tool with its description, gating metadata, and schemas.",
        empty_input_schema(),
        tool_output_schema(
            &json!({
                "tools": {
                    "type": "array",
                    "items": object_schema(
                        &json!({
                            "name": schema_string("Tool name."),
                            "description": schema_string("Tool description."),
                            "gating": gating_schema(),
                            "input_schema": { "type": "object" },
                            "output_schema": { "type": "object" }
                        }),
                        &["name", "description", "gating", "input_schema", "output_schema"],
                    )
                }
            }),
            &["tools"],
        ),
        vec![ToolExample {
            description: "Catalog entry for runtime.probe.".to_string(),
            input: json!({}),
            output: json!({
                "tools": [{
                    "name": "runtime.probe",
                    "description": "Return metadata describing the active runtime backend.",
                    "gating": {
                        "requires_contract": true,
                        "required_capabilities": ["DATA_ONLY"],
                        "allowlist_respected": true,
                        "runtime_backed": true
                    },
                    "input_schema": { "type": "object" },
                    "output_schema": { "type": "object" }
                }]
            }),
        }],
        vec!["Always allowed; reflects the registry built at startup.".to_string()],
    )
}

/// Builds the tool contract for `workspace.list_files`.
fn workspace_list_files_contract() -> ToolContract {
    build_tool_contract(
        ToolName::WorkspaceListFiles,
        "List files under the workspace root up to a maximum depth.",
        tool_input_schema(
            &json!({
                "max_depth": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Directory depth to descend; 0 lists only top-level files."
                }
            }),
            &[],
        ),
        tool_output_schema(
            &json!({
                "files": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Sorted relative paths using forward slashes."
                },
                "truncated": {
                    "type": "boolean",
                    "description": "True when the file limit cut the listing short."
                }
            }),
            &["files", "truncated"],
        ),
        vec![ToolExample {
            description: "List files two levels deep.".to_string(),
            input: json!({ "max_depth": 2 }),
            output: json!({
                "files": ["Cargo.toml", "src/lib.rs"],
                "truncated": false
            }),
        }],
        vec![
            "Requires an active contract; no capability is needed.".to_string(),
            "Skips .git, .venv, __pycache__, target, and symbolic links.".to_string(),
            "max_depth defaults to 3 and is capped by server configuration.".to_string(),
        ],
    )
}

/// Builds the tool contract for `runtime.probe`.
fn runtime_probe_contract() -> ToolContract {
    build_tool_contract(
        ToolName::RuntimeProbe,
        "Return metadata describing the active runtime backend.",
        empty_input_schema(),
        tool_output_schema(&runtime_info_properties(), &["name", "version"]),
        vec![ToolExample {
            description: "Probe the fixture runtime.".to_string(),
            input: json!({}),
            output: json!({
                "name": FixtureRuntime::NAME,
                "version": FixtureRuntime::VERSION
            }),
        }],
        vec![
            "Requires DATA_ONLY and a live runtime adapter.".to_string(),
            "Remote failures return runtime_unavailable with retryable set.".to_string(),
        ],
    )
}

/// Builds the tool contract for `scene.list_objects`.
fn scene_list_objects_contract() -> ToolContract {
    build_tool_contract(
        ToolName::SceneListObjects,
        "List objects in the active runtime scene.",
        empty_input_schema(),
        tool_output_schema(
            &json!({
                "objects": {
                    "type": "array",
                    "items": scene_object_schema()
                }
            }),
            &["objects"],
        ),
        vec![ToolExample {
            description: "List fixture scene objects.".to_string(),
            input: json!({}),
            output: json!({
                "objects": [
                    { "id": "obj-cube", "name": "Cube", "type": "MESH" },
                    { "id": "obj-camera", "name": "Camera", "type": "CAMERA" }
                ]
            }),
        }],
        vec!["Requires DATA_ONLY and a live runtime adapter.".to_string()],
    )
}

// ============================================================================
// SECTION: Schema Helpers
// ============================================================================

/// Assembles a tool contract with gating metadata from the tool name.
fn build_tool_contract(
    name: ToolName,
    description: &str,
    input_schema: Value,
    output_schema: Value,
    examples: Vec<ToolExample>,
    notes: Vec<String>,
) -> ToolContract {
    ToolContract {
        name,
        description: description.to_string(),
        input_schema,
        output_schema,
        gating: name.gating(),
        examples,
        notes,
    }
}

/// Builds the input schema for tools without parameters.
fn empty_input_schema() -> Value {
    tool_input_schema(&json!({}), &[])
}

/// Builds a standard tool input schema wrapper.
fn tool_input_schema(properties: &Value, required: &[&str]) -> Value {
    with_schema(object_schema(properties, required))
}

/// Builds a standard tool output schema wrapper.
fn tool_output_schema(properties: &Value, required: &[&str]) -> Value {
    with_schema(object_schema(properties, required))
}

/// Builds an object schema without the top-level `$schema` annotation.
fn object_schema(properties: &Value, required: &[&str]) -> Value {
    let required_values: Vec<Value> =
        required.iter().map(|value| Value::String((*value).to_string())).collect();
    json!({
        "type": "object",
        "required": required_values,
        "properties": properties,
        "additionalProperties": false
    })
}

/// Adds a `$schema` header to a top-level JSON schema.
fn with_schema(schema: Value) -> Value {
    let Value::Object(mut map) = schema else {
        return schema;
    };
    map.insert(
        String::from("$schema"),
        Value::String(String::from("https://json-schema.org/draft/2020-12/schema")),
    );
    Value::Object(map)
}

/// Returns a described string schema.
fn schema_string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

/// Returns a schema for nullable strings.
fn schema_nullable_string(description: &str) -> Value {
    json!({
        "oneOf": [{ "type": "null" }, { "type": "string" }],
        "description": description
    })
}

/// Returns the capability token schema.
fn capability_schema() -> Value {
    let tokens: Vec<&str> = Capability::all().iter().map(|cap| cap.as_str()).collect();
    json!({ "type": "string", "enum": tokens })
}

/// Returns the runtime kind schema.
fn runtime_kind_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "enum": ["unavailable", "fixture", "remote"],
        "description": description
    })
}

/// Returns the gating metadata schema.
fn gating_schema() -> Value {
    object_schema(
        &json!({
            "requires_contract": { "type": "boolean" },
            "required_capabilities": { "type": "array", "items": capability_schema() },
            "allowlist_respected": { "type": "boolean" },
            "runtime_backed": { "type": "boolean" }
        }),
        &["requires_contract", "required_capabilities", "allowlist_respected", "runtime_backed"],
    )
}

/// Returns runtime probe properties.
fn runtime_info_properties() -> Value {
    json!({
        "name": schema_string("Runtime backend name."),
        "version": schema_string("Runtime backend version.")
    })
}

/// Returns the scene object descriptor schema.
fn scene_object_schema() -> Value {
    object_schema(
        &json!({
            "id": schema_string("Object identifier."),
            "name": schema_string("Object name."),
            "type": schema_string("Object kind.")
        }),
        &["name"],
    )
}

/// Returns the contract view schema.
fn contract_view_schema() -> Value {
    let host = object_schema(
        &json!({
            "name": schema_string("Host profile name."),
            "transport": { "type": "string", "enum": ["stdio"] }
        }),
        &["name", "transport"],
    );
    let runtime = object_schema(
        &json!({
            "name": schema_string("Runtime profile name."),
            "mode": { "type": "string", "enum": ["data_only"] },
            "version": schema_string("Runtime profile version."),
            "base_url": schema_nullable_string("Remote backend base address.")
        }),
        &["name", "mode", "version", "base_url"],
    );
    object_schema(
        &json!({
            "contract_id": schema_string("Unique contract identifier (UUID v4)."),
            "contract_version": schema_string("Contract schema version."),
            "created_at": schema_string("RFC 3339 creation timestamp."),
            "host_profile": schema_string("Host profile name."),
            "runtime_profile": schema_string("Runtime profile name."),
            "capabilities": { "type": "array", "items": capability_schema() },
            "tool_allowlist": {
                "oneOf": [
                    { "type": "null" },
                    { "type": "array", "items": { "type": "string" } }
                ]
            },
            "resolved": object_schema(
                &json!({
                    "host": { "oneOf": [{ "type": "null" }, host] },
                    "runtime": { "oneOf": [{ "type": "null" }, runtime] }
                }),
                &["host", "runtime"],
            )
        }),
        &[
            "contract_id",
            "contract_version",
            "created_at",
            "host_profile",
            "runtime_profile",
            "capabilities",
            "tool_allowlist",
            "resolved",
        ],
    )
}

/// Returns an example contract view payload.
fn example_contract_view() -> Value {
    json!({
        "contract_id": "3f1c2b9e-5d7a-4c1e-9b2f-6a8d0e4f7c31",
        "contract_version": "1.0",
        "created_at": "2026-01-15T09:30:00Z",
        "host_profile": "codex_stdio",
        "runtime_profile": "inmemory",
        "capabilities": ["DATA_ONLY"],
        "tool_allowlist": ["runtime.probe", "scene.list_objects"],
        "resolved": {
            "host": { "name": "codex_stdio", "transport": "stdio" },
            "runtime": {
                "name": "inmemory",
                "mode": "data_only",
                "version": "0",
                "base_url": null
            }
        }
    })
}

#[cfg(test)]
mod tests;
