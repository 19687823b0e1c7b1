// crates/scenegate-providers/src/remote.rs
// ============================================================================
// Module: Remote Runtime Adapter
// Description: Runtime adapter delegating to an HTTP backend.
// Purpose: Query probe and scene endpoints with strict limits.
// Dependencies: scenegate-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The remote adapter issues bounded GET requests against
//! `{base}/runtime/probe` and `{base}/scene/objects`. Backends answer with a
//! `{ "ok": true, "result": ... }` envelope. Redirects are not followed and
//! response bodies are size-limited. Every failure, whether transport,
//! status, size, or shape, surfaces as [`RuntimeError::Unavailable`] and no
//! request is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use scenegate_core::RuntimeAdapter;
use scenegate_core::RuntimeError;
use scenegate_core::RuntimeInfo;
use scenegate_core::RuntimeKind;
use scenegate_core::SceneObject;
use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Probe endpoint path.
const PROBE_PATH: &str = "runtime/probe";
/// Scene object listing endpoint path.
const SCENE_OBJECTS_PATH: &str = "scene/objects";
/// Maximum nesting depth for `objects` unwrapping.
const MAX_OBJECTS_NESTING: usize = 8;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the remote runtime adapter.
///
/// # Invariants
/// - `base_url` uses `http` or `https` and carries no credentials.
/// - `timeout_ms` applies to the full request lifecycle.
/// - `max_response_bytes` is a hard upper bound on response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRuntimeConfig {
    /// Backend base address.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for RemoteRuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9876".to_string(),
            timeout_ms: 3_000,
            max_response_bytes: 1024 * 1024,
            user_agent: "scenegate/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Adapter Implementation
// ============================================================================

/// Runtime adapter backed by a remote HTTP service.
pub struct RemoteRuntime {
    /// Adapter configuration.
    config: RemoteRuntimeConfig,
    /// Parsed probe endpoint.
    probe_url: Url,
    /// Parsed scene objects endpoint.
    objects_url: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl RemoteRuntime {
    /// Creates a remote adapter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteRuntimeError`] when the base address is invalid or the
    /// HTTP client cannot be created.
    pub fn new(config: RemoteRuntimeConfig) -> Result<Self, RemoteRuntimeError> {
        let base = base_endpoint(&config.base_url)?;
        let probe_url = endpoint_url(&base, PROBE_PATH)?;
        let objects_url = endpoint_url(&base, SCENE_OBJECTS_PATH)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| RemoteRuntimeError::Client(err.to_string()))?;
        Ok(Self {
            config,
            probe_url,
            objects_url,
            client,
        })
    }

    /// Fetches an endpoint and extracts its `result` payload.
    fn fetch_result(&self, url: &Url) -> Result<Value, RuntimeError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|err| unavailable(format!("runtime request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("runtime returned status {}", status.as_u16())));
        }
        let body = read_response_limited(&mut response, self.config.max_response_bytes)?;
        let payload: Value = serde_json::from_slice(&body)
            .map_err(|_| unavailable("runtime response is not valid json".to_string()))?;
        extract_result(payload)
    }
}

impl RuntimeAdapter for RemoteRuntime {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Remote
    }

    fn probe(&self) -> Result<RuntimeInfo, RuntimeError> {
        let result = self.fetch_result(&self.probe_url)?;
        serde_json::from_value(result)
            .map_err(|_| unavailable("runtime probe response has unexpected shape".to_string()))
    }

    fn list_scene_objects(&self) -> Result<Vec<SceneObject>, RuntimeError> {
        let result = self.fetch_result(&self.objects_url)?;
        let objects = unwrap_objects(result)?;
        serde_json::from_value(objects)
            .map_err(|_| unavailable("runtime scene objects have unexpected shape".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and validates the base address.
///
/// Query and fragment are dropped and the path gains a trailing slash so
/// endpoint paths join beneath any path prefix.
fn base_endpoint(base_url: &str) -> Result<Url, RemoteRuntimeError> {
    let mut base = Url::parse(base_url)
        .map_err(|_| RemoteRuntimeError::InvalidUrl(format!("unparseable url: {base_url}")))?;
    match base.scheme() {
        "http" | "https" => {}
        other => {
            return Err(RemoteRuntimeError::InvalidUrl(format!("unsupported scheme: {other}")));
        }
    }
    if !base.username().is_empty() || base.password().is_some() {
        return Err(RemoteRuntimeError::InvalidUrl("url credentials are not allowed".to_string()));
    }
    if base.host_str().is_none() {
        return Err(RemoteRuntimeError::InvalidUrl("url host is required".to_string()));
    }
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Builds an endpoint URL under a validated base address.
fn endpoint_url(base: &Url, path: &str) -> Result<Url, RemoteRuntimeError> {
    base.join(path)
        .map_err(|err| RemoteRuntimeError::InvalidUrl(format!("cannot join {path}: {err}")))
}

/// Maps a message into the runtime unavailable condition.
const fn unavailable(message: String) -> RuntimeError {
    RuntimeError::Unavailable(message)
}

/// Extracts the `result` member from a backend envelope.
fn extract_result(payload: Value) -> Result<Value, RuntimeError> {
    let Value::Object(mut map) = payload else {
        return Err(unavailable("runtime response is not a json object".to_string()));
    };
    if map.get("ok").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("error")
            .and_then(|error| error.get("message").and_then(Value::as_str).or_else(|| error.as_str()))
            .unwrap_or("runtime reported failure");
        return Err(unavailable(message.to_string()));
    }
    map.remove("result").ok_or_else(|| unavailable("runtime response missing result".to_string()))
}

/// Unwraps nested `objects` members until an array is reached.
fn unwrap_objects(mut value: Value) -> Result<Value, RuntimeError> {
    for _ in 0 .. MAX_OBJECTS_NESTING {
        match value {
            Value::Array(_) => return Ok(value),
            Value::Object(mut map) => {
                value = map
                    .remove("objects")
                    .ok_or_else(|| unavailable("runtime scene objects missing".to_string()))?;
            }
            _ => return Err(unavailable("runtime scene objects have unexpected shape".to_string())),
        }
    }
    if value.is_array() {
        return Ok(value);
    }
    Err(unavailable("runtime scene objects nested too deeply".to_string()))
}

/// Reads a response body while enforcing a hard size limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, RuntimeError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| unavailable("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(unavailable("runtime response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle
        .read_to_end(&mut buf)
        .map_err(|_| unavailable("failed to read runtime response".to_string()))?;
    if buf.len() > max_bytes {
        return Err(unavailable("runtime response exceeds size limit".to_string()));
    }
    Ok(buf)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Remote adapter construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteRuntimeError {
    /// Base address rejected.
    #[error("invalid runtime url: {0}")]
    InvalidUrl(String),
    /// HTTP client construction failed.
    #[error("http client build failed: {0}")]
    Client(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
