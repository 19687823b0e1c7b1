// crates/scenegate-config/src/lib.rs
// ============================================================================
// Module: Scene Gate Config Library
// Description: Canonical config model, environment overrides, and examples.
// Purpose: Single source of truth for scenegate.toml semantics.
// Dependencies: scenegate-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `scenegate-config` defines the configuration model for Scene Gate. Values
//! come from a TOML file, then from `SCENEGATE_*` environment overrides, and
//! are validated strictly before the server is built. The core crates never
//! read the environment themselves.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use env::EnvOverrides;
pub use examples::config_toml_example;
