// crates/scenegate-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Router
// Description: Gate-checked tool dispatch for the Scene Gate server.
// Purpose: Compose session snapshots, the gate evaluator, and tool handlers.
// Dependencies: scenegate-core, scenegate-contract, scenegate-providers
// ============================================================================

//! ## Overview
//! The tool router dispatches tool calls for one session at a time. Each call
//! takes a session snapshot, evaluates the gate against it, and only then
//! decodes arguments and runs the handler. Every outcome, including a
//! panicking handler, becomes a [`ToolEnvelope`].
//!
//! ## Invariants
//! - A denied call never reaches its handler.
//! - Handlers observe the contract and runtime adapter captured by the
//!   snapshot, never a later install.
//! - Every call emits exactly one tool call audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::Arc;

use scenegate_config::RuntimeConfig;
use scenegate_config::WorkspaceConfig;
use scenegate_contract::ToolDefinition;
use scenegate_core::CAPABILITIES_VERSION;
use scenegate_core::ContractError;
use scenegate_core::ContractRequest;
use scenegate_core::ContractView;
use scenegate_core::ErrorBody;
use scenegate_core::ErrorCode;
use scenegate_core::GateDecision;
use scenegate_core::GateRequest;
use scenegate_core::RuntimeError;
use scenegate_core::RuntimeKind;
use scenegate_core::SceneObject;
use scenegate_core::SessionContract;
use scenegate_core::SessionSnapshot;
use scenegate_core::SessionStore;
use scenegate_core::SharedRuntime;
use scenegate_core::ToolEnvelope;
use scenegate_core::ToolGating;
use scenegate_core::ToolName;
use scenegate_core::evaluate_gate;
use scenegate_core::profiles::runtime_profile;
use scenegate_providers::build_runtime;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::audit::AuditDecision;
use crate::audit::ContractAuditEvent;
use crate::audit::McpAuditSink;
use crate::audit::ToolCallAuditEvent;
use crate::audit::ToolCallAuditParams;
use crate::context::RequestContext;
use crate::registry::ToolRegistry;
use crate::workspace::DEFAULT_LIST_DEPTH;
use crate::workspace::list_files;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Gateway name reported by `system.health`.
pub const SERVER_NAME: &str = "scenegate";
/// Gateway version reported by `system.health`.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Tool router for Scene Gate requests.
#[derive(Clone)]
pub struct ToolRouter {
    /// Registered tool contracts.
    registry: Arc<ToolRegistry>,
    /// Session contracts and runtime adapters.
    sessions: Arc<SessionStore>,
    /// Runtime settings used when a contract selects a remote backend.
    runtime: RuntimeConfig,
    /// Workspace listing settings.
    workspace: WorkspaceConfig,
    /// Audit sink for tool calls and contract installs.
    audit: Arc<dyn McpAuditSink>,
}

/// Configuration inputs for building a tool router.
pub struct ToolRouterConfig {
    /// Registered tool contracts.
    pub registry: ToolRegistry,
    /// Session store shared with other transports.
    pub sessions: Arc<SessionStore>,
    /// Runtime settings.
    pub runtime: RuntimeConfig,
    /// Workspace listing settings.
    pub workspace: WorkspaceConfig,
    /// Audit sink.
    pub audit: Arc<dyn McpAuditSink>,
}

impl ToolRouter {
    /// Creates a new tool router.
    #[must_use]
    pub fn new(config: ToolRouterConfig) -> Self {
        Self {
            registry: Arc::new(config.registry),
            sessions: config.sessions,
            runtime: config.runtime,
            workspace: config.workspace,
            audit: config.audit,
        }
    }

    /// Returns the session store.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Lists the tools supported by this server.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Handles a tool call by name with a JSON payload.
    ///
    /// Never fails; every failure is carried in the returned envelope.
    pub fn handle_tool_call(
        &self,
        context: &RequestContext,
        name: &str,
        payload: Value,
    ) -> ToolEnvelope {
        let snapshot = self.sessions.snapshot(&context.session);
        let gating = self.registry.gating(name);
        let decision = evaluate_gate(&GateRequest {
            tool: name,
            gating,
            contract: snapshot.contract.as_deref(),
            runtime: snapshot.runtime.kind(),
        });
        let (audit_decision, envelope) = match decision {
            GateDecision::Deny(denial) => {
                (AuditDecision::Deny, ToolEnvelope::Err(denial.into_error_body()))
            }
            GateDecision::Allow => {
                (AuditDecision::Allow, self.dispatch_guarded(context, name, payload, &snapshot))
            }
        };
        self.audit.record(&ToolCallAuditEvent::new(ToolCallAuditParams {
            context,
            tool: name,
            decision: audit_decision,
            error_code: envelope.error_code(),
            contract_id: snapshot
                .contract
                .as_ref()
                .map(|contract| contract.contract_id().as_str().to_string()),
        }));
        envelope
    }

    /// Runs a handler, mapping panics to `internal_error`.
    fn dispatch_guarded(
        &self,
        context: &RequestContext,
        name: &str,
        payload: Value,
        snapshot: &SessionSnapshot,
    ) -> ToolEnvelope {
        let outcome =
            catch_unwind(AssertUnwindSafe(|| self.dispatch(context, name, payload, snapshot)));
        match outcome {
            Ok(Ok(result)) => ToolEnvelope::Ok(result),
            Ok(Err(err)) => ToolEnvelope::Err(err.into_error_body()),
            Err(_) => ToolEnvelope::Err(
                ToolError::Internal("tool handler panicked".to_string()).into_error_body(),
            ),
        }
    }

    /// Routes an allowed call to its handler.
    fn dispatch(
        &self,
        context: &RequestContext,
        name: &str,
        payload: Value,
        snapshot: &SessionSnapshot,
    ) -> Result<Value, ToolError> {
        let tool = ToolName::parse(name)
            .filter(|tool| self.registry.get(tool.as_str()).is_some())
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        match tool {
            ToolName::SystemHealth => self.handle_system_health(payload),
            ToolName::Echo => Self::handle_echo(payload),
            ToolName::ContractCreate => self.handle_contract_create(context, payload),
            ToolName::ContractGet => Self::handle_contract_get(payload, snapshot),
            ToolName::ToolsCatalog => self.handle_tools_catalog(payload),
            ToolName::WorkspaceListFiles => self.handle_workspace_list_files(payload),
            ToolName::RuntimeProbe => Self::handle_runtime_probe(payload, snapshot),
            ToolName::SceneListObjects => Self::handle_scene_list_objects(payload, snapshot),
        }
    }

    /// Handles `system.health`.
    fn handle_system_health(&self, payload: Value) -> Result<Value, ToolError> {
        let _ = decode::<EmptyRequest>(payload)?;
        to_value(&HealthResponse {
            name: SERVER_NAME,
            version: SERVER_VERSION,
            capabilities_version: CAPABILITIES_VERSION,
            runtime: self.sessions.default_runtime().kind(),
        })
    }

    /// Handles `echo`.
    fn handle_echo(payload: Value) -> Result<Value, ToolError> {
        let request = decode::<EchoRequest>(payload)?;
        Ok(Value::String(request.text))
    }

    /// Handles `contract.create`.
    fn handle_contract_create(
        &self,
        context: &RequestContext,
        payload: Value,
    ) -> Result<Value, ToolError> {
        let request = decode::<ContractRequest>(payload)?;
        let contract = SessionContract::create(request)?;
        let runtime = self.runtime_for_profile(contract.runtime_profile())?;
        let installed = self.sessions.install(&context.session, contract, runtime);
        let contract = installed
            .snapshot
            .contract
            .ok_or_else(|| ToolError::Internal("installed contract missing".to_string()))?;
        self.audit.record_contract(
            &ContractAuditEvent::new(context, &contract, installed.snapshot.runtime.kind())
                .with_evicted(installed.evicted.as_ref()),
        );
        to_value(&contract.view())
    }

    /// Handles `contract.get` against the snapshot.
    fn handle_contract_get(payload: Value, snapshot: &SessionSnapshot) -> Result<Value, ToolError> {
        let _ = decode::<EmptyRequest>(payload)?;
        to_value(&ContractGetResponse {
            contract: snapshot.contract.as_deref().map(SessionContract::view),
        })
    }

    /// Handles `system.tools_catalog`.
    fn handle_tools_catalog(&self, payload: Value) -> Result<Value, ToolError> {
        let _ = decode::<EmptyRequest>(payload)?;
        let tools = self
            .registry
            .contracts()
            .iter()
            .map(|contract| CatalogEntry {
                name: contract.name,
                description: &contract.description,
                gating: contract.gating,
                input_schema: &contract.input_schema,
                output_schema: &contract.output_schema,
            })
            .collect();
        to_value(&CatalogResponse {
            tools,
        })
    }

    /// Handles `workspace.list_files`.
    fn handle_workspace_list_files(&self, payload: Value) -> Result<Value, ToolError> {
        let request = decode::<ListFilesRequest>(payload)?;
        let max_depth = request.max_depth.unwrap_or(DEFAULT_LIST_DEPTH);
        if max_depth > self.workspace.max_depth {
            return Err(ToolError::InvalidParams(format!(
                "max_depth must be at most {}",
                self.workspace.max_depth
            )));
        }
        let listing = list_files(&self.workspace.root_path(), max_depth, self.workspace.max_files)
            .map_err(|err| ToolError::Internal(format!("workspace listing failed: {err}")))?;
        to_value(&listing)
    }

    /// Handles `runtime.probe` against the snapshot adapter.
    fn handle_runtime_probe(payload: Value, snapshot: &SessionSnapshot) -> Result<Value, ToolError> {
        let _ = decode::<EmptyRequest>(payload)?;
        let info = snapshot.runtime.probe()?;
        to_value(&info)
    }

    /// Handles `scene.list_objects` against the snapshot adapter.
    fn handle_scene_list_objects(
        payload: Value,
        snapshot: &SessionSnapshot,
    ) -> Result<Value, ToolError> {
        let _ = decode::<EmptyRequest>(payload)?;
        let objects = snapshot.runtime.list_scene_objects()?;
        to_value(&SceneObjectsResponse {
            objects,
        })
    }

    /// Builds the remote adapter named by a runtime profile, if any.
    fn runtime_for_profile(&self, name: &str) -> Result<Option<SharedRuntime>, ToolError> {
        let Some(base_url) = runtime_profile(name).and_then(|profile| profile.base_url) else {
            return Ok(None);
        };
        let selection = self.runtime.remote_selection(base_url);
        build_runtime(&selection)
            .map(Some)
            .map_err(|err| ToolError::Internal(format!("remote runtime setup failed: {err}")))
    }
}

// ============================================================================
// SECTION: Request and Response Types
// ============================================================================

/// Arguments for tools that take none.
#[derive(Debug, Deserialize)]
struct EmptyRequest {}

/// Arguments for `echo`.
#[derive(Debug, Deserialize)]
struct EchoRequest {
    /// Text to echo.
    text: String,
}

/// Arguments for `workspace.list_files`.
#[derive(Debug, Deserialize)]
struct ListFilesRequest {
    /// Requested listing depth.
    #[serde(default)]
    max_depth: Option<usize>,
}

/// Result of `system.health`.
#[derive(Debug, Serialize)]
struct HealthResponse {
    /// Gateway name.
    name: &'static str,
    /// Gateway version.
    version: &'static str,
    /// Capability token set version.
    capabilities_version: &'static str,
    /// Default runtime adapter kind.
    runtime: RuntimeKind,
}

/// Result of `contract.get`.
#[derive(Debug, Serialize)]
struct ContractGetResponse<'a> {
    /// Active contract view, or null.
    contract: Option<ContractView<'a>>,
}

/// One `system.tools_catalog` entry.
#[derive(Debug, Serialize)]
struct CatalogEntry<'a> {
    /// Tool name.
    name: ToolName,
    /// Tool description.
    description: &'a str,
    /// Gating metadata.
    gating: ToolGating,
    /// Input schema.
    input_schema: &'a Value,
    /// Output schema.
    output_schema: &'a Value,
}

/// Result of `system.tools_catalog`.
#[derive(Debug, Serialize)]
struct CatalogResponse<'a> {
    /// Registered tools.
    tools: Vec<CatalogEntry<'a>>,
}

/// Result of `scene.list_objects`.
#[derive(Debug, Serialize)]
struct SceneObjectsResponse {
    /// Scene objects.
    objects: Vec<SceneObject>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool routing errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name not registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// Tool payload deserialization failed.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// Contract construction failed.
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// Runtime adapter failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// Tool payload serialization failed.
    #[error("serialization failure")]
    Serialization,
    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Returns the envelope code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownTool(_) | Self::InvalidParams(_) | Self::Contract(_) => {
                ErrorCode::InvalidRequest
            }
            Self::Runtime(_) => ErrorCode::RuntimeUnavailable,
            Self::Serialization | Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Converts the error into an envelope error body.
    #[must_use]
    pub fn into_error_body(self) -> ErrorBody {
        ErrorBody::new(self.code(), self.to_string())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a JSON value into a typed request payload; null reads as `{}`.
fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ToolError> {
    let payload = if payload.is_null() { Value::Object(Map::new()) } else { payload };
    serde_json::from_value(payload).map_err(|err| ToolError::InvalidParams(err.to_string()))
}

/// Serializes a handler response.
fn to_value<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|_| ToolError::Serialization)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
