// crates/scenegate-core/src/runtime.rs
// ============================================================================
// Module: Runtime Adapter Interface
// Description: Uniform interface over runtime backends.
// Purpose: Let runtime-backed tools query scene data without knowing the backend.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Runtime-backed tools talk to a [`RuntimeAdapter`]. The set of adapter
//! kinds is closed: [`UnavailableRuntime`] always fails, [`FixtureRuntime`]
//! returns canned data, and the remote HTTP adapter lives in
//! `scenegate-providers`. Adapters are selected by a [`RuntimeSelection`]
//! handed in by the bootstrap layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Backend metadata returned by a probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// Backend name.
    pub name: String,
    /// Backend version.
    pub version: String,
}

/// Lightweight scene object descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object identifier when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Object display name.
    pub name: String,
    /// Object kind when the backend provides one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Closed set of runtime adapter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeKind {
    /// No backend; every operation fails.
    Unavailable,
    /// Deterministic canned data.
    Fixture,
    /// Remote HTTP backend.
    Remote,
}

impl RuntimeKind {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Fixture => "fixture",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime backend selection resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSelection {
    /// Use the unavailable adapter.
    Unavailable,
    /// Use the fixture adapter.
    Fixture,
    /// Use the remote HTTP adapter.
    Remote {
        /// Backend base address.
        base_url: String,
        /// Request timeout in milliseconds.
        timeout_ms: u64,
        /// Maximum response body size in bytes.
        max_response_bytes: usize,
    },
}

impl RuntimeSelection {
    /// Returns the adapter kind this selection produces.
    #[must_use]
    pub const fn kind(&self) -> RuntimeKind {
        match self {
            Self::Unavailable => RuntimeKind::Unavailable,
            Self::Fixture => RuntimeKind::Fixture,
            Self::Remote {
                ..
            } => RuntimeKind::Remote,
        }
    }
}

// ============================================================================
// SECTION: Interface
// ============================================================================

/// Runtime backend interface.
pub trait RuntimeAdapter: Send + Sync {
    /// Returns the adapter kind.
    fn kind(&self) -> RuntimeKind;

    /// Returns backend metadata.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the backend cannot be reached.
    fn probe(&self) -> Result<RuntimeInfo, RuntimeError>;

    /// Lists objects in the backend's active scene.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the backend cannot be reached.
    fn list_scene_objects(&self) -> Result<Vec<SceneObject>, RuntimeError>;
}

/// Shared runtime adapter handle.
pub type SharedRuntime = Arc<dyn RuntimeAdapter>;

/// Runtime adapter failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The backend could not serve the request.
    #[error("{0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Built-in Adapters
// ============================================================================

/// Adapter used when no runtime backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRuntime;

impl RuntimeAdapter for UnavailableRuntime {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Unavailable
    }

    fn probe(&self) -> Result<RuntimeInfo, RuntimeError> {
        Err(RuntimeError::Unavailable("Runtime unavailable".to_string()))
    }

    fn list_scene_objects(&self) -> Result<Vec<SceneObject>, RuntimeError> {
        Err(RuntimeError::Unavailable("Runtime unavailable".to_string()))
    }
}

/// In-process adapter returning fixed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRuntime {
    /// Probe metadata.
    info: RuntimeInfo,
    /// Scene objects.
    objects: Vec<SceneObject>,
}

impl FixtureRuntime {
    /// Fixture backend name.
    pub const NAME: &'static str = "in-memory-runtime";
    /// Fixture backend version.
    pub const VERSION: &'static str = "0.0.0";

    /// Creates the fixture with its canned scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            info: RuntimeInfo {
                name: Self::NAME.to_string(),
                version: Self::VERSION.to_string(),
            },
            objects: vec![
                fixture_object("obj-cube", "Cube", "MESH"),
                fixture_object("obj-camera", "Camera", "CAMERA"),
            ],
        }
    }
}

impl Default for FixtureRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeAdapter for FixtureRuntime {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Fixture
    }

    fn probe(&self) -> Result<RuntimeInfo, RuntimeError> {
        Ok(self.info.clone())
    }

    fn list_scene_objects(&self) -> Result<Vec<SceneObject>, RuntimeError> {
        Ok(self.objects.clone())
    }
}

/// Builds a fixture scene object.
fn fixture_object(id: &str, name: &str, kind: &str) -> SceneObject {
    SceneObject {
        id: Some(id.to_string()),
        name: name.to_string(),
        kind: Some(kind.to_string()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
