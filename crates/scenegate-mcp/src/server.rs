// crates/scenegate-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: Stdio and HTTP transports for Scene Gate.
// Purpose: Expose gate-checked tools via JSON-RPC 2.0 and a plain HTTP facade.
// Dependencies: scenegate-config, scenegate-core, scenegate-providers, axum, tokio
// ============================================================================

//! ## Overview
//! The server exposes Scene Gate tools using JSON-RPC 2.0 over stdio or
//! HTTP, and an HTTP facade (`/health`, `/tools`, `/contract/create`,
//! `/call`) that answers with the tool envelope directly. Every call is
//! routed through [`crate::tools::ToolRouter`]. Inputs are untrusted: bodies
//! are size-limited and malformed payloads become `invalid_request`.
//!
//! The stdio transport accepts both `Content-Length` framed and
//! newline-delimited messages and replies in the framing it received.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use scenegate_config::ScenegateConfig;
use scenegate_config::ServerAuditConfig;
use scenegate_config::ServerTransport;
use scenegate_core::ErrorCode;
use scenegate_core::SessionKey;
use scenegate_core::SessionStore;
use scenegate_core::ToolEnvelope;
use scenegate_core::ToolName;
use scenegate_providers::build_runtime;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::audit::McpAuditSink;
use crate::audit::McpFileAuditSink;
use crate::audit::McpNoopAuditSink;
use crate::audit::McpStderrAuditSink;
use crate::context::RequestContext;
use crate::registry::ToolRegistry;
use crate::tools::SERVER_NAME;
use crate::tools::SERVER_VERSION;
use crate::tools::ToolRouter;
use crate::tools::ToolRouterConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header naming the HTTP caller's session.
pub const SESSION_HEADER: &str = "x-scenegate-session";
/// MCP protocol version reported by `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server configuration.
    config: ScenegateConfig,
    /// Tool router for request dispatch.
    router: ToolRouter,
}

impl McpServer {
    /// Builds a new MCP server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when initialization fails.
    pub fn from_config(config: ScenegateConfig) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let router = build_router(&config)?;
        Ok(Self {
            config,
            router,
        })
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        let max_body_bytes = self.config.server.max_body_bytes;
        match self.config.server.transport {
            ServerTransport::Stdio => {
                let router = self.router;
                tokio::task::spawn_blocking(move || serve_stdio(&router, max_body_bytes))
                    .await
                    .map_err(|err| McpServerError::Transport(format!("stdio task failed: {err}")))?
            }
            ServerTransport::Http => serve_http(&self.config, self.router).await,
        }
    }
}

/// Builds the tool router, session store, and audit sink from configuration.
///
/// # Errors
///
/// Returns [`McpServerError::Init`] when a component cannot be created.
pub fn build_router(config: &ScenegateConfig) -> Result<ToolRouter, McpServerError> {
    let default_runtime = build_runtime(&config.runtime.selection())
        .map_err(|err| McpServerError::Init(err.to_string()))?;
    let sessions = Arc::new(SessionStore::new(default_runtime, config.server.max_sessions));
    let registry = ToolRegistry::canonical().map_err(|err| McpServerError::Init(err.to_string()))?;
    let audit = build_audit_sink(&config.server.audit)?;
    Ok(ToolRouter::new(ToolRouterConfig {
        registry,
        sessions,
        runtime: config.runtime.clone(),
        workspace: config.workspace.clone(),
        audit,
    }))
}

/// Selects the audit sink for the configuration.
fn build_audit_sink(config: &ServerAuditConfig) -> Result<Arc<dyn McpAuditSink>, McpServerError> {
    if !config.enabled {
        return Ok(Arc::new(McpNoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = McpFileAuditSink::new(Path::new(path.trim()))
                .map_err(|err| McpServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(McpStderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Serves JSON-RPC requests over stdin/stdout.
fn serve_stdio(router: &ToolRouter, max_body_bytes: usize) -> Result<(), McpServerError> {
    let mut reader = BufReader::new(std::io::stdin());
    let mut writer = std::io::stdout();
    serve_stream(router, &mut reader, &mut writer, max_body_bytes)
}

/// Serves JSON-RPC messages from `reader` until end of input.
///
/// All calls run against the `stdio` session. Malformed messages get a
/// `-32700` reply and reading continues with the next message.
///
/// # Errors
///
/// Returns [`McpServerError::Transport`] on I/O failures.
pub fn serve_stream<R: Read, W: Write>(
    router: &ToolRouter,
    reader: &mut BufReader<R>,
    writer: &mut W,
    max_body_bytes: usize,
) -> Result<(), McpServerError> {
    let context = RequestContext::stdio();
    while let Some(message) = read_message(reader, max_body_bytes)? {
        let reply = match message.body {
            Ok(body) => match serde_json::from_slice::<JsonRpcRequest>(&body) {
                Ok(request) => {
                    handle_request(router, &context, request).map(|(_, response)| response)
                }
                Err(_) => Some(JsonRpcResponse::failure(Value::Null, -32700, "parse error")),
            },
            Err(err) => Some(JsonRpcResponse::failure(Value::Null, -32700, err.message())),
        };
        if let Some(response) = reply {
            let payload = serde_json::to_vec(&response).map_err(|_| {
                McpServerError::Transport("json-rpc serialization failed".to_string())
            })?;
            write_message(writer, message.framing, &payload)?;
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Serves JSON-RPC and the HTTP facade.
async fn serve_http(config: &ScenegateConfig, router: ToolRouter) -> Result<(), McpServerError> {
    let addr: SocketAddr = config
        .server
        .effective_bind()
        .parse()
        .map_err(|_| McpServerError::Config("invalid bind address".to_string()))?;
    let app = http_app(router, config.server.max_body_bytes);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
    let _ = writeln!(std::io::stderr(), "scenegate: listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .map_err(|_| McpServerError::Transport("http server failed".to_string()))
}

/// Builds the HTTP application.
#[must_use]
pub fn http_app(router: ToolRouter, max_body_bytes: usize) -> Router {
    let state = Arc::new(ServerState {
        router,
        max_body_bytes,
    });
    Router::new()
        .route("/rpc", post(handle_rpc))
        .route("/health", get(handle_health))
        .route("/tools", get(handle_tools))
        .route("/contract/create", post(handle_contract_create))
        .route("/call", post(handle_call))
        .layer(DefaultBodyLimit::max(max_body_bytes.saturating_add(1)))
        .with_state(state)
}

/// Shared server state for HTTP handlers.
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// HTTP status paired with an envelope body.
type EnvelopeReply = (StatusCode, Json<Value>);

/// Handles HTTP JSON-RPC requests.
async fn handle_rpc(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    if bytes.len() > state.max_body_bytes {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(JsonRpcResponse::failure(Value::Null, -32070, "request body too large")),
        )
            .into_response();
    }
    let context = match session_context(&headers) {
        Ok(context) => context,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::failure(Value::Null, -32600, "invalid session header")),
            )
                .into_response();
        }
    };
    let Ok(request) = serde_json::from_slice::<JsonRpcRequest>(bytes.as_ref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(JsonRpcResponse::failure(Value::Null, -32600, "invalid json-rpc request")),
        )
            .into_response();
    };
    match handle_request(&state.router, &context, request) {
        Some((status, response)) => (status, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Handles `GET /health`.
async fn handle_health(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> EnvelopeReply {
    facade_call(&state, &headers, ToolName::SystemHealth.as_str(), empty_object())
}

/// Handles `GET /tools`.
async fn handle_tools(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> EnvelopeReply {
    facade_call(&state, &headers, ToolName::ToolsCatalog.as_str(), empty_object())
}

/// Handles `POST /contract/create`; the body is the tool arguments.
async fn handle_contract_create(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    bytes: Bytes,
) -> EnvelopeReply {
    let body = match parse_facade_body(&state, &bytes) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    let arguments = if body.is_null() { empty_object() } else { body };
    facade_call(&state, &headers, ToolName::ContractCreate.as_str(), arguments)
}

/// Handles `POST /call` with a `{name, params}` body.
async fn handle_call(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    bytes: Bytes,
) -> EnvelopeReply {
    let body = match parse_facade_body(&state, &bytes) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    let Some(name) = body.get("name").and_then(Value::as_str).filter(|name| !name.is_empty())
    else {
        return envelope_error(StatusCode::BAD_REQUEST, "Missing tool name");
    };
    let arguments = body.get("params").filter(|params| !params.is_null()).cloned();
    facade_call(&state, &headers, name, arguments.unwrap_or_else(empty_object))
}

/// Runs a facade tool call for the header-selected session.
fn facade_call(
    state: &ServerState,
    headers: &HeaderMap,
    name: &str,
    arguments: Value,
) -> EnvelopeReply {
    let context = match session_context(headers) {
        Ok(context) => context,
        Err(reply) => return reply,
    };
    let envelope = call_tool_with_blocking(&state.router, &context, name, arguments);
    (StatusCode::OK, Json(envelope.to_value()))
}

/// Enforces the body limit and parses a JSON facade body.
fn parse_facade_body(state: &ServerState, bytes: &Bytes) -> Result<Value, EnvelopeReply> {
    if bytes.len() > state.max_body_bytes {
        return Err(envelope_error(StatusCode::PAYLOAD_TOO_LARGE, "request body too large"));
    }
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes.as_ref())
        .map_err(|_| envelope_error(StatusCode::BAD_REQUEST, "request body is not valid json"))
}

/// Resolves the request context from the session header.
fn session_context(headers: &HeaderMap) -> Result<RequestContext, EnvelopeReply> {
    let Some(value) = headers.get(SESSION_HEADER) else {
        return Ok(RequestContext::http(SessionKey::default_session()));
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| SessionKey::parse(raw).ok())
        .map(RequestContext::http)
        .ok_or_else(|| {
            envelope_error(StatusCode::BAD_REQUEST, "invalid x-scenegate-session header")
        })
}

/// Builds an `invalid_request` envelope reply.
fn envelope_error(status: StatusCode, message: &str) -> EnvelopeReply {
    (status, Json(ToolEnvelope::error(ErrorCode::InvalidRequest, message).to_value()))
}

/// Returns an empty JSON object.
fn empty_object() -> Value {
    Value::Object(Map::new())
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier; absent for notifications.
    #[serde(default)]
    id: Option<Value>,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    #[serde(default)]
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Builds a success response.
    const fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response.
    fn failure(id: Value, code: i64, message: &str) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.to_string(),
            }),
        }
    }
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// Result of `initialize`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult {
    /// Protocol version spoken by the server.
    protocol_version: &'static str,
    /// Advertised server capabilities.
    capabilities: Value,
    /// Server identity.
    server_info: ServerInfo,
}

/// Server identity reported by `initialize`.
#[derive(Debug, Serialize)]
struct ServerInfo {
    /// Server name.
    name: &'static str,
    /// Server version.
    version: &'static str,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<scenegate_contract::ToolDefinition>,
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolCallResult {
    /// Tool output content.
    content: Vec<ToolContent>,
    /// The tool envelope.
    structured_content: Value,
    /// True when the envelope carries an error.
    is_error: bool,
}

/// Tool output payloads for JSON-RPC responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// Serialized envelope text.
    Text {
        /// Envelope JSON.
        text: String,
    },
}

/// Dispatches a JSON-RPC request; notifications yield no response.
fn handle_request(
    router: &ToolRouter,
    base_context: &RequestContext,
    request: JsonRpcRequest,
) -> Option<(StatusCode, JsonRpcResponse)> {
    let id = request.id?;
    let context = base_context.clone().with_request_id(id.to_string());
    if request.jsonrpc != "2.0" {
        return Some((
            StatusCode::BAD_REQUEST,
            JsonRpcResponse::failure(id, -32600, "invalid json-rpc version"),
        ));
    }
    let reply = match request.method.as_str() {
        "initialize" => result_reply(
            id,
            &InitializeResult {
                protocol_version: PROTOCOL_VERSION,
                capabilities: serde_json::json!({ "tools": {} }),
                server_info: ServerInfo {
                    name: SERVER_NAME,
                    version: SERVER_VERSION,
                },
            },
        ),
        "ping" => (StatusCode::OK, JsonRpcResponse::success(id, empty_object())),
        "tools/list" => result_reply(
            id,
            &ToolListResult {
                tools: router.list_tools(),
            },
        ),
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            match serde_json::from_value::<ToolCallParams>(params) {
                Ok(call) => {
                    let envelope =
                        call_tool_with_blocking(router, &context, &call.name, call.arguments);
                    let structured = envelope.to_value();
                    result_reply(
                        id,
                        &ToolCallResult {
                            content: vec![ToolContent::Text {
                                text: structured.to_string(),
                            }],
                            is_error: !envelope.is_ok(),
                            structured_content: structured,
                        },
                    )
                }
                Err(_) => (
                    StatusCode::BAD_REQUEST,
                    JsonRpcResponse::failure(id, -32602, "invalid tool params"),
                ),
            }
        }
        _ => (StatusCode::BAD_REQUEST, JsonRpcResponse::failure(id, -32601, "method not found")),
    };
    Some(reply)
}

/// Serializes a method result into a success reply.
fn result_reply<T: Serialize>(id: Value, result: &T) -> (StatusCode, JsonRpcResponse) {
    match serde_json::to_value(result) {
        Ok(value) => (StatusCode::OK, JsonRpcResponse::success(id, value)),
        Err(_) => (StatusCode::OK, JsonRpcResponse::failure(id, -32603, "serialization failed")),
    }
}

/// Executes a tool call, shifting to a blocking context when available.
fn call_tool_with_blocking(
    router: &ToolRouter,
    context: &RequestContext,
    name: &str,
    arguments: Value,
) -> ToolEnvelope {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| router.handle_tool_call(context, name, arguments))
        }
        _ => router.handle_tool_call(context, name, arguments),
    }
}

// ============================================================================
// SECTION: Framing Helpers
// ============================================================================

/// Stdio message framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// `Content-Length` headers followed by the payload.
    ContentLength,
    /// One JSON document per line.
    Newline,
}

/// Malformed stdio message; the reader has already skipped past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramingError {
    /// Payload or line exceeds the body limit.
    TooLarge,
    /// Header line is oversized or carries an unparseable length.
    InvalidHeader,
    /// Input ended inside a framed message.
    Truncated,
}

impl FramingError {
    /// Returns the JSON-RPC error message for this failure.
    const fn message(self) -> &'static str {
        match self {
            Self::TooLarge => "parse error: payload too large",
            Self::InvalidHeader => "parse error: invalid content length",
            Self::Truncated => "parse error: truncated message",
        }
    }
}

/// One stdio message.
#[derive(Debug)]
struct StdioMessage {
    /// Framing the message arrived in.
    framing: Framing,
    /// Raw payload, or why it could not be read.
    body: Result<Vec<u8>, FramingError>,
}

/// Result of reading one bounded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineRead {
    /// End of input.
    Eof,
    /// A complete line within the limit.
    Line,
    /// Oversized line, discarded through its terminator.
    TooLong,
}

/// Reads the next stdio message; `None` at end of input.
///
/// Malformed messages are returned with a [`FramingError`] body so the
/// caller can reply and keep reading. Only I/O failures are errors.
fn read_message(
    reader: &mut BufReader<impl Read>,
    max_body_bytes: usize,
) -> Result<Option<StdioMessage>, McpServerError> {
    let mut line = Vec::new();
    loop {
        line.clear();
        match read_bounded_line(reader, &mut line, max_body_bytes)? {
            LineRead::Eof => return Ok(None),
            LineRead::TooLong => {
                return Ok(Some(StdioMessage {
                    framing: Framing::Newline,
                    body: Err(FramingError::TooLarge),
                }));
            }
            LineRead::Line => {}
        }
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(length) = content_length(trimmed) {
            let body = read_framed_body(reader, length, max_body_bytes)?;
            return Ok(Some(StdioMessage {
                framing: Framing::ContentLength,
                body,
            }));
        }
        let body = if trimmed.len() > max_body_bytes {
            Err(FramingError::TooLarge)
        } else {
            Ok(trimmed.to_vec())
        };
        return Ok(Some(StdioMessage {
            framing: Framing::Newline,
            body,
        }));
    }
}

/// Reads one raw line of at most the body limit plus a CRLF terminator.
fn read_bounded_line(
    reader: &mut BufReader<impl Read>,
    line: &mut Vec<u8>,
    max_body_bytes: usize,
) -> Result<LineRead, McpServerError> {
    let read_failed = |_| McpServerError::Transport("stdio read failed".to_string());
    let limit = u64::try_from(max_body_bytes).unwrap_or(u64::MAX).saturating_add(2);
    let bytes = reader.by_ref().take(limit).read_until(b'\n', line).map_err(read_failed)?;
    if bytes == 0 {
        return Ok(LineRead::Eof);
    }
    if !line.ends_with(b"\n") && line.len() > max_body_bytes {
        discard_line(reader).map_err(read_failed)?;
        return Ok(LineRead::TooLong);
    }
    Ok(LineRead::Line)
}

/// Consumes input through the next newline or end of input.
fn discard_line(reader: &mut BufReader<impl Read>) -> std::io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        if let Some(index) = available.iter().position(|byte| *byte == b'\n') {
            reader.consume(index + 1);
            return Ok(());
        }
        let consumed = available.len();
        reader.consume(consumed);
    }
}

/// Parses a `Content-Length` header line; other lines yield `None`.
fn content_length(line: &[u8]) -> Option<Result<usize, FramingError>> {
    let line = std::str::from_utf8(line).ok()?;
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    Some(value.trim().parse::<usize>().map_err(|_| FramingError::InvalidHeader))
}

/// Reads the remaining headers and the payload of a framed message.
///
/// An oversized payload with a known length is skipped so the next message
/// starts cleanly.
fn read_framed_body(
    reader: &mut BufReader<impl Read>,
    mut length: Result<usize, FramingError>,
    max_body_bytes: usize,
) -> Result<Result<Vec<u8>, FramingError>, McpServerError> {
    let read_failed = |_| McpServerError::Transport("stdio read failed".to_string());
    let mut line = Vec::new();
    loop {
        line.clear();
        match read_bounded_line(reader, &mut line, max_body_bytes)? {
            LineRead::Eof => return Ok(Err(FramingError::Truncated)),
            LineRead::TooLong => length = Err(FramingError::InvalidHeader),
            LineRead::Line => {
                let trimmed = line.trim_ascii();
                if trimmed.is_empty() {
                    break;
                }
                if let Some(parsed) = content_length(trimmed) {
                    length = length.and(parsed);
                }
            }
        }
    }
    let length = match length {
        Ok(length) => length,
        Err(err) => return Ok(Err(err)),
    };
    if length > max_body_bytes {
        let skip = u64::try_from(length).unwrap_or(u64::MAX);
        std::io::copy(&mut reader.by_ref().take(skip), &mut std::io::sink())
            .map_err(read_failed)?;
        return Ok(Err(FramingError::TooLarge));
    }
    let mut buf = vec![0u8; length];
    match reader.read_exact(&mut buf) {
        Ok(()) => Ok(Ok(buf)),
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
            Ok(Err(FramingError::Truncated))
        }
        Err(err) => Err(read_failed(err)),
    }
}

/// Writes a payload in the given framing.
fn write_message(
    writer: &mut impl Write,
    framing: Framing,
    payload: &[u8],
) -> Result<(), McpServerError> {
    let write_failed = |_| McpServerError::Transport("stdio write failed".to_string());
    if framing == Framing::ContentLength {
        let header = format!("Content-Length: {}\r\n\r\n", payload.len());
        writer.write_all(header.as_bytes()).map_err(write_failed)?;
        writer.write_all(payload).map_err(write_failed)?;
    } else {
        writer.write_all(payload).map_err(write_failed)?;
        writer.write_all(b"\n").map_err(write_failed)?;
    }
    writer.flush().map_err(write_failed)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
