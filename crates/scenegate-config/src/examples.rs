// crates/scenegate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration for Scene Gate.
// Purpose: Provide a documented starting point that always validates.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The example mirrors every default so operators can copy it verbatim.

/// Returns a canonical `scenegate.toml` example.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"# Scene Gate configuration.

[server]
# "stdio" or "http".
transport = "stdio"
# HTTP bind address; must be loopback.
bind = "127.0.0.1:8765"
max_body_bytes = 1048576
max_sessions = 1024

[server.audit]
enabled = true
# JSON lines audit log; stderr when omitted.
# path = "scenegate-audit.jsonl"

[runtime]
# "unavailable", "fixture", or "remote".
backend = "unavailable"
# remote_url = "http://127.0.0.1:9876"
timeout_ms = 3000
max_response_bytes = 1048576

[workspace]
# root = "."
max_depth = 16
max_files = 10000
"#,
    )
}
