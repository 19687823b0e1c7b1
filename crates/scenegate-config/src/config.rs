// crates/scenegate-config/src/config.rs
// ============================================================================
// Module: Scene Gate Configuration
// Description: Configuration loading and validation for Scene Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: scenegate-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! A missing default file yields the built-in defaults; a missing file that
//! was named explicitly is an error. Unknown keys are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use scenegate_core::RuntimeSelection;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::env::EnvOverrides;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "scenegate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SCENEGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default HTTP bind address.
pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8765";
/// Default remote runtime base address.
pub const DEFAULT_REMOTE_URL: &str = "http://127.0.0.1:9876";
/// Minimum remote runtime timeout in milliseconds.
pub(crate) const MIN_RUNTIME_TIMEOUT_MS: u64 = 100;
/// Maximum remote runtime timeout in milliseconds.
pub(crate) const MAX_RUNTIME_TIMEOUT_MS: u64 = 30_000;
/// Upper bound for the workspace listing depth cap.
pub(crate) const MAX_WORKSPACE_DEPTH: usize = 64;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level Scene Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenegateConfig {
    /// Server transport and limits.
    #[serde(default)]
    pub server: ServerConfig,
    /// Default runtime backend.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Workspace listing settings.
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

impl ScenegateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_ENV_VAR).ok();
        Self::load_from(path, env_path.as_deref())
    }

    /// Loads configuration, then applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load_with_overrides(
        path: Option<&Path>,
        overrides: &EnvOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        overrides.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with an explicit environment path value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_from(path: Option<&Path>, env_path: Option<&str>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path, env_path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml(content)?;
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.runtime.validate()?;
        self.workspace.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Transport served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC and the HTTP facade over HTTP.
    Http,
}

impl ServerTransport {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Transport type.
    #[serde(default)]
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Maximum number of sessions holding a contract.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            bind: None,
            max_body_bytes: default_max_body_bytes(),
            max_sessions: default_max_sessions(),
            audit: ServerAuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the HTTP bind address, falling back to the default.
    #[must_use]
    pub fn effective_bind(&self) -> &str {
        self.bind.as_deref().map_or(DEFAULT_HTTP_BIND, str::trim)
    }

    /// Validates server transport configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid("max_sessions must be greater than zero".to_string()));
        }
        self.audit.validate()?;
        if self.transport == ServerTransport::Http {
            let bind = self.effective_bind();
            if bind.is_empty() {
                return Err(ConfigError::Invalid("http transport requires bind address".to_string()));
            }
            let addr: SocketAddr = bind
                .parse()
                .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))?;
            if !addr.ip().is_loopback() {
                return Err(ConfigError::Invalid("non-loopback bind disallowed".to_string()));
            }
        }
        Ok(())
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerAuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl ServerAuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("server.audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Runtime
// ============================================================================

/// Runtime backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeBackend {
    /// No runtime backend.
    #[default]
    Unavailable,
    /// Deterministic fixture backend.
    Fixture,
    /// Remote HTTP backend.
    Remote,
}

impl RuntimeBackend {
    /// Parses a backend label, accepting legacy aliases.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unavailable" | "none" => Some(Self::Unavailable),
            "fixture" | "inmemory" => Some(Self::Fixture),
            "remote" | "external_http" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Runtime backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Default backend for sessions.
    #[serde(default)]
    pub backend: RuntimeBackend,
    /// Remote base address override.
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Remote request timeout in milliseconds.
    #[serde(default = "default_runtime_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum remote response size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend: RuntimeBackend::Unavailable,
            remote_url: None,
            timeout_ms: default_runtime_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl RuntimeConfig {
    /// Returns the default runtime selection.
    #[must_use]
    pub fn selection(&self) -> RuntimeSelection {
        match self.backend {
            RuntimeBackend::Unavailable => RuntimeSelection::Unavailable,
            RuntimeBackend::Fixture => RuntimeSelection::Fixture,
            RuntimeBackend::Remote => {
                self.remote_selection(self.remote_url.as_deref().unwrap_or(DEFAULT_REMOTE_URL))
            }
        }
    }

    /// Returns a remote selection for `profile_url`, preferring the override.
    #[must_use]
    pub fn remote_selection(&self, profile_url: &str) -> RuntimeSelection {
        RuntimeSelection::Remote {
            base_url: self.remote_url.clone().unwrap_or_else(|| profile_url.to_string()),
            timeout_ms: self.timeout_ms,
            max_response_bytes: self.max_response_bytes,
        }
    }

    /// Validates runtime configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_RUNTIME_TIMEOUT_MS ..= MAX_RUNTIME_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "runtime.timeout_ms must be between {MIN_RUNTIME_TIMEOUT_MS} and \
                 {MAX_RUNTIME_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 {
            return Err(ConfigError::Invalid(
                "runtime.max_response_bytes must be greater than zero".to_string(),
            ));
        }
        if let Some(remote_url) = &self.remote_url {
            validate_remote_url(remote_url)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Workspace
// ============================================================================

/// Workspace listing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Workspace root; the process working directory when unset.
    #[serde(default)]
    pub root: Option<String>,
    /// Largest accepted `max_depth`.
    #[serde(default = "default_workspace_max_depth")]
    pub max_depth: usize,
    /// Maximum number of files returned by one listing.
    #[serde(default = "default_workspace_max_files")]
    pub max_files: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_depth: default_workspace_max_depth(),
            max_files: default_workspace_max_files(),
        }
    }
}

impl WorkspaceConfig {
    /// Returns the workspace root path.
    #[must_use]
    pub fn root_path(&self) -> PathBuf {
        self.root.as_ref().map_or_else(|| PathBuf::from("."), PathBuf::from)
    }

    /// Validates workspace configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.root {
            validate_path_string("workspace.root", root)?;
        }
        if self.max_depth > MAX_WORKSPACE_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "workspace.max_depth must be at most {MAX_WORKSPACE_DEPTH}"
            )));
        }
        if self.max_files == 0 {
            return Err(ConfigError::Invalid(
                "workspace.max_files must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag marks paths the caller named.
fn resolve_path(
    path: Option<&Path>,
    env_path: Option<&str>,
) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = env_path.filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    validate_path(Path::new(trimmed))
}

/// Validates a remote runtime base address.
fn validate_remote_url(value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|_| ConfigError::Invalid("runtime.remote_url is not a valid url".to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid("runtime.remote_url must use http or https".to_string()));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("runtime.remote_url requires a host".to_string()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(
            "runtime.remote_url must not embed credentials".to_string(),
        ));
    }
    Ok(())
}

/// Default maximum request body size.
pub(crate) const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Default maximum session count.
pub(crate) const fn default_max_sessions() -> usize {
    1024
}

/// Audit logging is on by default.
pub(crate) const fn default_audit_enabled() -> bool {
    true
}

/// Default remote runtime timeout.
pub(crate) const fn default_runtime_timeout_ms() -> u64 {
    3_000
}

/// Default remote response size limit.
pub(crate) const fn default_max_response_bytes() -> usize {
    1024 * 1024
}

/// Default workspace depth cap.
pub(crate) const fn default_workspace_max_depth() -> usize {
    16
}

/// Default workspace file cap.
pub(crate) const fn default_workspace_max_files() -> usize {
    10_000
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
