// crates/scenegate-providers/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared mock runtime servers for provider tests.
// Purpose: Provide reusable test infrastructure for deterministic testing.
// Dependencies: tiny_http
// ============================================================================

//! ## Overview
//! Mock runtime backends built on `tiny_http`. Each server answers a fixed
//! number of requests from a path-to-response table and then exits.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;

use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Mock Runtime Server
// ============================================================================

/// Canned response served for one path.
#[derive(Clone)]
pub struct Route {
    /// Request path to match.
    pub path: &'static str,
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl Route {
    /// Builds a 200 JSON route.
    #[must_use]
    pub fn json(path: &'static str, body: &serde_json::Value) -> Self {
        Self {
            path,
            status: 200,
            body: body.to_string(),
        }
    }
}

/// Spawns a mock runtime that answers `requests` requests.
///
/// Unknown paths receive a 404.
#[must_use]
pub fn spawn_runtime(routes: Vec<Route>, requests: usize) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = format!("http://{addr}");
    let handle = thread::spawn(move || {
        for _ in 0 .. requests {
            let Ok(request) = server.recv() else {
                return;
            };
            let route = routes.iter().find(|route| route.path == request.url());
            let response = route.map_or_else(
                || Response::from_string("not found").with_status_code(404),
                |route| {
                    let header =
                        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                    Response::from_string(route.body.clone())
                        .with_status_code(route.status)
                        .with_header(header)
                },
            );
            let _ = request.respond(response);
        }
    });
    (url, handle)
}

/// Returns an address nothing listens on.
#[must_use]
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
