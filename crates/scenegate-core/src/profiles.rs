// crates/scenegate-core/src/profiles.rs
// ============================================================================
// Module: Profile Registry
// Description: Static host and runtime profile records.
// Purpose: Resolve profile names carried by session contracts.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Profiles describe the host a caller runs in and the runtime backend a
//! contract targets. Contracts store raw profile names; lookups here are
//! advisory and an unregistered name simply resolves to `None`. A runtime
//! profile with a base address names a remote backend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Transport a host profile communicates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostTransport {
    /// Line or Content-Length framed JSON-RPC over stdin/stdout.
    Stdio,
}

/// Registered host profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostProfile {
    /// Profile name.
    pub name: &'static str,
    /// Host transport.
    pub transport: HostTransport,
}

/// Runtime operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeMode {
    /// Read-only data access.
    DataOnly,
}

/// Registered runtime profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuntimeProfile {
    /// Profile name.
    pub name: &'static str,
    /// Operating mode.
    pub mode: RuntimeMode,
    /// Profile version label.
    pub version: &'static str,
    /// Default base address for remote runtime backends.
    pub base_url: Option<&'static str>,
}

impl RuntimeProfile {
    /// Returns true when the profile targets a remote backend.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.base_url.is_some()
    }
}

/// Registry records resolved for a contract's profile names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedProfiles {
    /// Host profile record, or `None` when unregistered.
    pub host: Option<HostProfile>,
    /// Runtime profile record, or `None` when unregistered.
    pub runtime: Option<RuntimeProfile>,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registered host profiles.
pub const HOST_PROFILES: &[HostProfile] = &[HostProfile {
    name: "codex_stdio",
    transport: HostTransport::Stdio,
}];

/// Registered runtime profiles.
pub const RUNTIME_PROFILES: &[RuntimeProfile] = &[
    RuntimeProfile {
        name: "none",
        mode: RuntimeMode::DataOnly,
        version: "0",
        base_url: None,
    },
    RuntimeProfile {
        name: "inmemory",
        mode: RuntimeMode::DataOnly,
        version: "0",
        base_url: None,
    },
    RuntimeProfile {
        name: "mcpblender_http",
        mode: RuntimeMode::DataOnly,
        version: "0",
        base_url: Some("http://127.0.0.1:9876"),
    },
];

/// Looks up a host profile by name.
#[must_use]
pub fn host_profile(name: &str) -> Option<&'static HostProfile> {
    HOST_PROFILES.iter().find(|profile| profile.name == name)
}

/// Looks up a runtime profile by name.
#[must_use]
pub fn runtime_profile(name: &str) -> Option<&'static RuntimeProfile> {
    RUNTIME_PROFILES.iter().find(|profile| profile.name == name)
}

/// Resolves both profile names against the registry.
#[must_use]
pub fn resolve(host: &str, runtime: &str) -> ResolvedProfiles {
    ResolvedProfiles {
        host: host_profile(host).copied(),
        runtime: runtime_profile(runtime).copied(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
