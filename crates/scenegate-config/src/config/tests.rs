// crates/scenegate-config/src/config/tests.rs
// ============================================================================
// Module: Config Unit Tests
// Description: Validation rules for the Scene Gate config model.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::path::Path;

use scenegate_core::RuntimeSelection;

use super::ConfigError;
use super::DEFAULT_HTTP_BIND;
use super::MAX_PATH_COMPONENT_LENGTH;
use super::RuntimeBackend;
use super::ScenegateConfig;
use super::ServerTransport;
use super::resolve_path;
use super::validate_path;

fn invalid(result: Result<ScenegateConfig, ConfigError>) -> String {
    match result {
        Err(ConfigError::Invalid(message)) => message,
        other => panic!("expected invalid config, got {other:?}"),
    }
}

#[test]
fn empty_document_yields_defaults() {
    let config = ScenegateConfig::from_toml("").unwrap();
    assert_eq!(config.server.transport, ServerTransport::Stdio);
    assert_eq!(config.server.effective_bind(), DEFAULT_HTTP_BIND);
    assert_eq!(config.runtime.backend, RuntimeBackend::Unavailable);
    assert_eq!(config.runtime.timeout_ms, 3_000);
    assert!(config.server.audit.enabled);
    assert_eq!(config.workspace.max_depth, 16);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = ScenegateConfig::from_toml("[server]\nlisten = \"x\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn http_transport_rejects_non_loopback_bind() {
    let message = invalid(ScenegateConfig::from_toml(
        "[server]\ntransport = \"http\"\nbind = \"0.0.0.0:8765\"\n",
    ));
    assert!(message.contains("non-loopback"));
}

#[test]
fn http_transport_rejects_malformed_bind() {
    let message =
        invalid(ScenegateConfig::from_toml("[server]\ntransport = \"http\"\nbind = \"localhost\"\n"));
    assert_eq!(message, "invalid bind address");
}

#[test]
fn timeout_bounds_are_inclusive() {
    assert!(ScenegateConfig::from_toml("[runtime]\ntimeout_ms = 100\n").is_ok());
    assert!(ScenegateConfig::from_toml("[runtime]\ntimeout_ms = 30000\n").is_ok());
    invalid(ScenegateConfig::from_toml("[runtime]\ntimeout_ms = 99\n"));
    invalid(ScenegateConfig::from_toml("[runtime]\ntimeout_ms = 30001\n"));
}

#[test]
fn remote_url_must_be_http() {
    let message =
        invalid(ScenegateConfig::from_toml("[runtime]\nremote_url = \"ftp://127.0.0.1\"\n"));
    assert!(message.contains("http or https"));
    invalid(ScenegateConfig::from_toml("[runtime]\nremote_url = \"http://u:p@127.0.0.1\"\n"));
}

#[test]
fn zero_limits_are_rejected() {
    invalid(ScenegateConfig::from_toml("[server]\nmax_body_bytes = 0\n"));
    invalid(ScenegateConfig::from_toml("[server]\nmax_sessions = 0\n"));
    invalid(ScenegateConfig::from_toml("[workspace]\nmax_files = 0\n"));
    invalid(ScenegateConfig::from_toml("[workspace]\nmax_depth = 65\n"));
}

#[test]
fn remote_selection_prefers_configured_url() {
    let config = ScenegateConfig::from_toml(
        "[runtime]\nbackend = \"remote\"\nremote_url = \"http://127.0.0.1:7000\"\ntimeout_ms = 500\n",
    )
    .unwrap();
    match config.runtime.selection() {
        RuntimeSelection::Remote {
            base_url,
            timeout_ms,
            ..
        } => {
            assert_eq!(base_url, "http://127.0.0.1:7000");
            assert_eq!(timeout_ms, 500);
        }
        other => panic!("unexpected selection {other:?}"),
    }
    match config.runtime.remote_selection("http://127.0.0.1:9876") {
        RuntimeSelection::Remote {
            base_url, ..
        } => assert_eq!(base_url, "http://127.0.0.1:7000"),
        other => panic!("unexpected selection {other:?}"),
    }
}

#[test]
fn remote_selection_uses_profile_url_without_override() {
    let config = ScenegateConfig::default();
    match config.runtime.remote_selection("http://127.0.0.1:9876") {
        RuntimeSelection::Remote {
            base_url, ..
        } => assert_eq!(base_url, "http://127.0.0.1:9876"),
        other => panic!("unexpected selection {other:?}"),
    }
    assert_eq!(config.runtime.selection(), RuntimeSelection::Unavailable);
}

#[test]
fn backend_aliases_parse_case_insensitively() {
    assert_eq!(RuntimeBackend::parse("NONE"), Some(RuntimeBackend::Unavailable));
    assert_eq!(RuntimeBackend::parse("InMemory"), Some(RuntimeBackend::Fixture));
    assert_eq!(RuntimeBackend::parse("external_http"), Some(RuntimeBackend::Remote));
    assert_eq!(RuntimeBackend::parse("blender"), None);
}

#[test]
fn resolve_path_marks_explicit_sources() {
    let (path, explicit) = resolve_path(Some(Path::new("custom.toml")), Some("env.toml")).unwrap();
    assert_eq!(path, Path::new("custom.toml"));
    assert!(explicit);
    let (path, explicit) = resolve_path(None, Some("env.toml")).unwrap();
    assert_eq!(path, Path::new("env.toml"));
    assert!(explicit);
    let (path, explicit) = resolve_path(None, Some("  ")).unwrap();
    assert_eq!(path, Path::new("scenegate.toml"));
    assert!(!explicit);
}

#[test]
fn validate_path_rejects_long_components() {
    let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
    assert!(validate_path(Path::new(&long)).is_err());
    assert!(validate_path(Path::new("ok/scenegate.toml")).is_ok());
}

#[test]
fn example_config_validates() {
    let config = ScenegateConfig::from_toml(&crate::config_toml_example()).unwrap();
    assert_eq!(config.server.max_sessions, 1024);
    assert_eq!(config.workspace.max_files, 10_000);
}
