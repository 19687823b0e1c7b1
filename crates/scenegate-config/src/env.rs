// crates/scenegate-config/src/env.rs
// ============================================================================
// Module: Environment Overrides
// Description: Parses SCENEGATE_* environment variables into typed overrides.
// Purpose: Let deployments select runtime, transport, and port without a file.
// Dependencies: url
// ============================================================================

//! ## Overview
//! Environment values are parsed up front so an unrecognized value fails
//! closed before any server starts. Runtime labels accept the legacy
//! aliases `none`, `inmemory`, and `external_http` case-insensitively.

use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::SocketAddr;

use crate::config::ConfigError;
use crate::config::DEFAULT_HTTP_BIND;
use crate::config::RuntimeBackend;
use crate::config::ScenegateConfig;
use crate::config::ServerTransport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Runtime backend selector variable.
pub const RUNTIME_ENV_VAR: &str = "SCENEGATE_RUNTIME";
/// Remote runtime base address variable.
pub const RUNTIME_URL_ENV_VAR: &str = "SCENEGATE_RUNTIME_URL";
/// Transport selector variable.
pub const TRANSPORT_ENV_VAR: &str = "SCENEGATE_TRANSPORT";
/// HTTP port variable.
pub const HTTP_PORT_ENV_VAR: &str = "SCENEGATE_HTTP_PORT";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Parsed environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Runtime backend override.
    pub runtime: Option<RuntimeBackend>,
    /// Remote base address override.
    pub runtime_url: Option<String>,
    /// Transport override.
    pub transport: Option<ServerTransport>,
    /// HTTP port override.
    pub http_port: Option<u16>,
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable holds an unknown value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through a lookup function.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable holds an unknown value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let runtime = read(RUNTIME_ENV_VAR)
            .map(|raw| {
                RuntimeBackend::parse(&raw).ok_or_else(|| {
                    ConfigError::Invalid(format!("{RUNTIME_ENV_VAR} has unknown value: {raw}"))
                })
            })
            .transpose()?;
        let transport = read(TRANSPORT_ENV_VAR)
            .map(|raw| match raw.to_ascii_lowercase().as_str() {
                "stdio" => Ok(ServerTransport::Stdio),
                "http" => Ok(ServerTransport::Http),
                _ => Err(ConfigError::Invalid(format!(
                    "{TRANSPORT_ENV_VAR} has unknown value: {raw}"
                ))),
            })
            .transpose()?;
        let http_port = read(HTTP_PORT_ENV_VAR)
            .map(|raw| {
                raw.parse::<u16>().ok().filter(|port| *port != 0).ok_or_else(|| {
                    ConfigError::Invalid(format!("{HTTP_PORT_ENV_VAR} is not a valid port: {raw}"))
                })
            })
            .transpose()?;
        Ok(Self {
            runtime,
            runtime_url: read(RUNTIME_URL_ENV_VAR),
            transport,
            http_port,
        })
    }

    /// Applies the overrides to a loaded configuration.
    ///
    /// The port override keeps the configured bind IP.
    pub fn apply(&self, config: &mut ScenegateConfig) {
        if let Some(runtime) = self.runtime {
            config.runtime.backend = runtime;
        }
        if let Some(url) = &self.runtime_url {
            config.runtime.remote_url = Some(url.clone());
        }
        if let Some(transport) = self.transport {
            config.server.transport = transport;
        }
        if let Some(port) = self.http_port {
            let ip = config
                .server
                .effective_bind()
                .parse::<SocketAddr>()
                .map(|addr| addr.ip())
                .or_else(|_| DEFAULT_HTTP_BIND.parse::<SocketAddr>().map(|addr| addr.ip()))
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
            config.server.bind = Some(SocketAddr::new(ip, port).to_string());
        }
    }
}
