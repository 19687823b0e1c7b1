// crates/scenegate-mcp/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared routers, HTTP servers, and mock runtimes for MCP tests.
// Purpose: Provide reusable test infrastructure for deterministic testing.
// Dependencies: scenegate-config, scenegate-mcp, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Builds routers from inline TOML, serves the HTTP application on an
//! ephemeral loopback port, and stands up `tiny_http` runtime backends.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;

use scenegate_config::ScenegateConfig;
use scenegate_mcp::ToolRouter;
use scenegate_mcp::build_router;
use scenegate_mcp::http_app;
use serde_json::Value;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Routers
// ============================================================================

/// Builds a config with audit disabled and the given extra TOML appended.
#[must_use]
pub fn config_with(extra: &str) -> ScenegateConfig {
    let toml = format!("[server.audit]\nenabled = false\n\n{extra}");
    ScenegateConfig::from_toml(&toml).unwrap()
}

/// Builds a router backed by the fixture runtime.
#[must_use]
pub fn fixture_router() -> ToolRouter {
    build_router(&config_with("[runtime]\nbackend = \"fixture\"\n")).unwrap()
}

// ============================================================================
// SECTION: HTTP Server
// ============================================================================

/// Serves the HTTP application on an ephemeral port and returns its base URL.
pub async fn spawn_http(router: ToolRouter, max_body_bytes: usize) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = http_app(router, max_body_bytes);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// HTTP status and parsed JSON body.
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Parsed body; null when empty.
    pub body: Value,
}

/// Sends a request and parses the JSON reply.
pub async fn send(request: reqwest::RequestBuilder) -> HttpReply {
    let response = request.send().await.unwrap();
    let status = response.status().as_u16();
    let text = response.text().await.unwrap();
    let body = if text.is_empty() { Value::Null } else { serde_json::from_str(&text).unwrap() };
    HttpReply {
        status,
        body,
    }
}

/// Posts a JSON body, optionally naming a session.
pub async fn post_json(base: &str, path: &str, body: &Value, session: Option<&str>) -> HttpReply {
    let client = reqwest::Client::new();
    let mut request = client
        .post(format!("{base}{path}"))
        .header("content-type", "application/json")
        .body(body.to_string());
    if let Some(session) = session {
        request = request.header("x-scenegate-session", session);
    }
    send(request).await
}

/// Sends a GET request.
pub async fn get(base: &str, path: &str) -> HttpReply {
    send(reqwest::Client::new().get(format!("{base}{path}"))).await
}

// ============================================================================
// SECTION: Mock Runtime Server
// ============================================================================

/// Spawns a runtime backend answering `requests` requests from a path table.
///
/// Unknown paths receive a 404.
#[must_use]
pub fn spawn_runtime(routes: Vec<(&'static str, Value)>, requests: usize) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    thread::spawn(move || {
        for _ in 0 .. requests {
            let Ok(request) = server.recv() else {
                return;
            };
            let route = routes.iter().find(|(path, _)| *path == request.url());
            let response = route.map_or_else(
                || Response::from_string("not found").with_status_code(404),
                |(_, body)| {
                    let header =
                        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                    Response::from_string(body.to_string()).with_header(header)
                },
            );
            let _ = request.respond(response);
        }
    });
    format!("http://{addr}")
}
