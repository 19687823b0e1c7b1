// crates/scenegate-providers/src/factory.rs
// ============================================================================
// Module: Runtime Adapter Factory
// Description: Builds runtime adapters from a configuration selection.
// Purpose: Keep adapter construction keyed by an explicit selection value.
// Dependencies: scenegate-core, crate::remote
// ============================================================================

//! ## Overview
//! [`build_runtime`] maps each [`RuntimeSelection`] variant to exactly one
//! adapter implementation. Callers never construct adapters directly.

use std::sync::Arc;

use scenegate_core::FixtureRuntime;
use scenegate_core::RuntimeSelection;
use scenegate_core::SharedRuntime;
use scenegate_core::UnavailableRuntime;

use crate::remote::RemoteRuntime;
use crate::remote::RemoteRuntimeConfig;
use crate::remote::RemoteRuntimeError;

/// Builds a shared runtime adapter for the selection.
///
/// # Errors
///
/// Returns [`RemoteRuntimeError`] when a remote adapter cannot be created.
pub fn build_runtime(selection: &RuntimeSelection) -> Result<SharedRuntime, RemoteRuntimeError> {
    match selection {
        RuntimeSelection::Unavailable => Ok(Arc::new(UnavailableRuntime)),
        RuntimeSelection::Fixture => Ok(Arc::new(FixtureRuntime::new())),
        RuntimeSelection::Remote {
            base_url,
            timeout_ms,
            max_response_bytes,
        } => {
            let adapter = RemoteRuntime::new(RemoteRuntimeConfig {
                base_url: base_url.clone(),
                timeout_ms: *timeout_ms,
                max_response_bytes: *max_response_bytes,
                ..RemoteRuntimeConfig::default()
            })?;
            Ok(Arc::new(adapter))
        }
    }
}
