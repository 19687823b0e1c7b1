// crates/scenegate-mcp/src/tools/tests.rs
// ============================================================================
// Module: Tool Router Unit Tests
// Description: Dispatch, gating, and envelope behavior of the tool router.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;

use scenegate_config::RuntimeConfig;
use scenegate_config::WorkspaceConfig;
use scenegate_core::ContractRequest;
use scenegate_core::ErrorCode;
use scenegate_core::FixtureRuntime;
use scenegate_core::RuntimeAdapter;
use scenegate_core::RuntimeError;
use scenegate_core::RuntimeInfo;
use scenegate_core::RuntimeKind;
use scenegate_core::SceneObject;
use scenegate_core::SessionContract;
use scenegate_core::SessionKey;
use scenegate_core::SessionStore;
use scenegate_core::SharedRuntime;
use scenegate_core::ToolEnvelope;
use scenegate_core::UnavailableRuntime;
use serde_json::Value;
use serde_json::json;

use super::ToolRouter;
use super::ToolRouterConfig;
use crate::audit::AuditDecision;
use crate::audit::ContractAuditEvent;
use crate::audit::McpAuditSink;
use crate::audit::ToolCallAuditEvent;
use crate::context::RequestContext;
use crate::registry::ToolRegistry;

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<ToolCallAuditEvent>>,
    contracts: Mutex<Vec<ContractAuditEvent>>,
}

impl McpAuditSink for RecordingSink {
    fn record(&self, event: &ToolCallAuditEvent) {
        self.calls.lock().unwrap().push(event.clone());
    }

    fn record_contract(&self, event: &ContractAuditEvent) {
        self.contracts.lock().unwrap().push(event.clone());
    }
}

struct PanickingRuntime;

impl RuntimeAdapter for PanickingRuntime {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Fixture
    }

    fn probe(&self) -> Result<RuntimeInfo, RuntimeError> {
        panic!("probe exploded")
    }

    fn list_scene_objects(&self) -> Result<Vec<SceneObject>, RuntimeError> {
        Ok(Vec::new())
    }
}

fn router_with(runtime: SharedRuntime, sink: Arc<RecordingSink>) -> ToolRouter {
    ToolRouter::new(ToolRouterConfig {
        registry: ToolRegistry::canonical().unwrap(),
        sessions: Arc::new(SessionStore::new(runtime, 4)),
        runtime: RuntimeConfig::default(),
        workspace: WorkspaceConfig::default(),
        audit: sink,
    })
}

fn fixture_router() -> (ToolRouter, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    (router_with(Arc::new(FixtureRuntime::new()), Arc::clone(&sink)), sink)
}

fn ok_result(envelope: ToolEnvelope) -> Value {
    match envelope {
        ToolEnvelope::Ok(result) => result,
        ToolEnvelope::Err(body) => panic!("expected ok, got {body:?}"),
    }
}

fn create(router: &ToolRouter, context: &RequestContext, payload: Value) -> ToolEnvelope {
    router.handle_tool_call(context, "contract.create", payload)
}

fn data_only() -> Value {
    json!({
        "host_profile": "codex_stdio",
        "runtime_profile": "inmemory",
        "capabilities": ["DATA_ONLY"]
    })
}

#[test]
fn denied_calls_skip_handlers_and_audit_deny() {
    let (router, sink) = fixture_router();
    let context = RequestContext::stdio();
    let envelope = router.handle_tool_call(&context, "runtime.probe", json!({}));
    assert_eq!(envelope.error_code(), Some(ErrorCode::ContractRequired));
    let calls = sink.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].decision, AuditDecision::Deny);
    assert_eq!(calls[0].error_code, Some(ErrorCode::ContractRequired));
}

#[test]
fn contract_create_installs_and_returns_view() {
    let (router, sink) = fixture_router();
    let context = RequestContext::stdio();
    let view = ok_result(create(&router, &context, data_only()));
    assert_eq!(view["contract_version"], "1.0");
    assert_eq!(view["capabilities"], json!(["DATA_ONLY"]));
    assert_eq!(view["resolved"]["host"]["transport"], "stdio");
    assert_eq!(view["resolved"]["runtime"]["name"], "inmemory");
    assert!(view["tool_allowlist"].is_null());

    let fetched = ok_result(router.handle_tool_call(&context, "contract.get", Value::Null));
    assert_eq!(fetched["contract"]["contract_id"], view["contract_id"]);
    assert_eq!(sink.contracts.lock().unwrap().len(), 1);
}

#[test]
fn contract_create_accepts_blank_profile_names() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    let view = ok_result(create(
        &router,
        &context,
        json!({"host_profile": "", "runtime_profile": "  ", "capabilities": []}),
    ));
    assert_eq!(view["host_profile"], "");
    assert_eq!(view["runtime_profile"], "  ");
    assert!(view["resolved"]["host"].is_null());
    assert!(view["resolved"]["runtime"].is_null());
}

#[test]
fn create_past_session_limit_evicts_oldest_session() {
    let (router, sink) = fixture_router();
    let contexts: Vec<RequestContext> = (0..5)
        .map(|index| RequestContext::http(SessionKey::parse(&format!("agent-{index}")).unwrap()))
        .collect();
    for context in &contexts {
        ok_result(create(&router, context, data_only()));
    }

    let oldest = ok_result(router.handle_tool_call(&contexts[0], "contract.get", Value::Null));
    assert!(oldest["contract"].is_null());
    let newest = ok_result(router.handle_tool_call(&contexts[4], "contract.get", Value::Null));
    assert!(newest["contract"].is_object());
    assert_eq!(router.sessions().len(), 4);

    let events = sink.contracts.lock().unwrap();
    assert_eq!(events.len(), 5);
    assert!(events[3].evicted_session.is_none());
    assert_eq!(events[4].evicted_session.as_deref(), Some("agent-0"));
}

#[test]
fn failed_create_keeps_prior_contract() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    let first = ok_result(create(&router, &context, data_only()));
    let failed = create(
        &router,
        &context,
        json!({
            "host_profile": "codex_stdio",
            "runtime_profile": "inmemory",
            "capabilities": ["UI_LIVE"]
        }),
    );
    match failed {
        ToolEnvelope::Err(body) => {
            assert_eq!(body.code, ErrorCode::InvalidRequest);
            assert_eq!(body.message, "UI_LIVE requires DATA_ONLY capability.");
            assert!(!body.retryable);
        }
        ToolEnvelope::Ok(_) => panic!("UI_LIVE alone must fail"),
    }
    let fetched = ok_result(router.handle_tool_call(&context, "contract.get", json!({})));
    assert_eq!(fetched["contract"]["contract_id"], first["contract_id"]);
}

#[test]
fn contract_get_is_null_without_contract() {
    let (router, _sink) = fixture_router();
    let fetched =
        ok_result(router.handle_tool_call(&RequestContext::stdio(), "contract.get", json!({})));
    assert!(fetched["contract"].is_null());
}

#[test]
fn sessions_are_isolated() {
    let (router, _sink) = fixture_router();
    let alpha = RequestContext::http(SessionKey::parse("alpha").unwrap());
    let beta = RequestContext::http(SessionKey::parse("beta").unwrap());
    ok_result(create(&router, &alpha, data_only()));
    assert!(router.handle_tool_call(&alpha, "runtime.probe", json!({})).is_ok());
    assert_eq!(
        router.handle_tool_call(&beta, "runtime.probe", json!({})).error_code(),
        Some(ErrorCode::ContractRequired)
    );
}

#[test]
fn runtime_tools_use_fixture_data() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    ok_result(create(&router, &context, data_only()));
    let info = ok_result(router.handle_tool_call(&context, "runtime.probe", json!({})));
    assert_eq!(info, json!({"name": "in-memory-runtime", "version": "0.0.0"}));
    let scene = ok_result(router.handle_tool_call(&context, "scene.list_objects", json!({})));
    assert_eq!(scene["objects"][0]["name"], "Cube");
    assert_eq!(scene["objects"][1]["type"], "CAMERA");
}

#[test]
fn unavailable_runtime_is_retryable() {
    let sink = Arc::new(RecordingSink::default());
    let router = router_with(Arc::new(UnavailableRuntime), sink);
    let context = RequestContext::stdio();
    ok_result(create(&router, &context, data_only()));
    match router.handle_tool_call(&context, "runtime.probe", json!({})) {
        ToolEnvelope::Err(body) => {
            assert_eq!(body.code, ErrorCode::RuntimeUnavailable);
            assert!(body.retryable);
            assert!(body.hint.is_some());
        }
        ToolEnvelope::Ok(_) => panic!("unavailable runtime must deny"),
    }
}

#[test]
fn unknown_tool_allowed_by_gate_is_invalid_request() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    assert_eq!(
        router.handle_tool_call(&context, "scene.move_object", json!({})).error_code(),
        Some(ErrorCode::ContractRequired)
    );
    ok_result(create(&router, &context, data_only()));
    match router.handle_tool_call(&context, "scene.move_object", json!({})) {
        ToolEnvelope::Err(body) => {
            assert_eq!(body.code, ErrorCode::InvalidRequest);
            assert!(body.message.contains("scene.move_object"));
        }
        ToolEnvelope::Ok(_) => panic!("unknown tool must fail"),
    }
}

#[test]
fn allowlist_denies_unlisted_tools() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    ok_result(create(
        &router,
        &context,
        json!({
            "host_profile": "codex_stdio",
            "runtime_profile": "inmemory",
            "capabilities": ["DATA_ONLY"],
            "tool_allowlist": []
        }),
    ));
    assert_eq!(
        router.handle_tool_call(&context, "runtime.probe", json!({})).error_code(),
        Some(ErrorCode::ToolNotAllowed)
    );
    assert!(router.handle_tool_call(&context, "system.tools_catalog", json!({})).is_ok());
}

#[test]
fn missing_capability_names_the_token() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    ok_result(create(
        &router,
        &context,
        json!({ "host_profile": "codex_stdio", "runtime_profile": "inmemory" }),
    ));
    match router.handle_tool_call(&context, "scene.list_objects", json!({})) {
        ToolEnvelope::Err(body) => {
            assert_eq!(body.code, ErrorCode::CapabilityRequired);
            assert_eq!(body.details.unwrap()["missing"], json!(["DATA_ONLY"]));
        }
        ToolEnvelope::Ok(_) => panic!("missing capability must deny"),
    }
}

#[test]
fn invalid_arguments_are_invalid_request() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    assert_eq!(
        router.handle_tool_call(&context, "echo", json!({})).error_code(),
        Some(ErrorCode::InvalidRequest)
    );
    assert_eq!(
        router.handle_tool_call(&context, "contract.create", json!("oops")).error_code(),
        Some(ErrorCode::InvalidRequest)
    );
    let echoed = ok_result(router.handle_tool_call(&context, "echo", json!({"text": "hi"})));
    assert_eq!(echoed, json!("hi"));
}

#[test]
fn panicking_handler_maps_to_internal_error() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    let contract = SessionContract::create(ContractRequest {
        host_profile: "codex_stdio".to_string(),
        runtime_profile: "inmemory".to_string(),
        capabilities: Some(vec!["DATA_ONLY".to_string()]),
        tool_allowlist: None,
    })
    .unwrap();
    router.sessions().install(&context.session, contract, Some(Arc::new(PanickingRuntime)));
    match router.handle_tool_call(&context, "runtime.probe", json!({})) {
        ToolEnvelope::Err(body) => assert_eq!(body.code, ErrorCode::InternalError),
        ToolEnvelope::Ok(_) => panic!("panic must surface as internal_error"),
    }
}

#[test]
fn remote_profile_switches_session_runtime() {
    let (router, sink) = fixture_router();
    let context = RequestContext::stdio();
    ok_result(create(
        &router,
        &context,
        json!({
            "host_profile": "codex_stdio",
            "runtime_profile": "mcpblender_http",
            "capabilities": ["DATA_ONLY"]
        }),
    ));
    let snapshot = router.sessions().snapshot(&context.session);
    assert_eq!(snapshot.runtime.kind(), RuntimeKind::Remote);
    assert_eq!(sink.contracts.lock().unwrap()[0].runtime, RuntimeKind::Remote);
    let untouched = router.sessions().snapshot(&SessionKey::default_session());
    assert_eq!(untouched.runtime.kind(), RuntimeKind::Fixture);
}

#[test]
fn health_reports_default_runtime() {
    let (router, _sink) = fixture_router();
    let health =
        ok_result(router.handle_tool_call(&RequestContext::stdio(), "system.health", json!({})));
    assert_eq!(health["name"], "scenegate");
    assert_eq!(health["capabilities_version"], "1.0");
    assert_eq!(health["runtime"], "fixture");
}

#[test]
fn catalog_lists_every_registered_tool() {
    let (router, _sink) = fixture_router();
    let catalog = ok_result(router.handle_tool_call(
        &RequestContext::stdio(),
        "system.tools_catalog",
        json!({}),
    ));
    let tools = catalog["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 8);
    let probe = tools.iter().find(|tool| tool["name"] == "runtime.probe").unwrap();
    assert_eq!(probe["gating"]["required_capabilities"], json!(["DATA_ONLY"]));
    assert_eq!(probe["gating"]["runtime_backed"], true);
}

#[test]
fn workspace_depth_above_cap_is_invalid() {
    let (router, _sink) = fixture_router();
    let context = RequestContext::stdio();
    ok_result(create(&router, &context, data_only()));
    assert_eq!(
        router
            .handle_tool_call(&context, "workspace.list_files", json!({"max_depth": 17}))
            .error_code(),
        Some(ErrorCode::InvalidRequest)
    );
}
