// crates/scenegate-core/src/contract.rs
// ============================================================================
// Module: Session Contract
// Description: Immutable per-session authorization record.
// Purpose: Construct validated contracts that gate tool execution.
// Dependencies: crate::{capability, identifiers, profiles}, serde, time
// ============================================================================

//! ## Overview
//! A session contract declares which host and runtime a caller targets,
//! which capabilities it holds, and optionally which tools it may call.
//! Contracts are validated at construction and never mutated afterwards; a
//! new contract replaces the old one wholesale.
//!
//! ## Invariants
//! - Capabilities satisfy the implication graph.
//! - `tool_allowlist = None` means unrestricted; `Some(empty)` admits only
//!   always-allowed tools.
//! - Profile names are stored verbatim, including empty strings, and may be
//!   unregistered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::capability::CapabilityError;
use crate::capability::CapabilitySet;
use crate::capability::validate_capabilities;
use crate::identifiers::ContractId;
use crate::profiles::ResolvedProfiles;
use crate::profiles::resolve;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Session contract schema version.
pub const CONTRACT_VERSION: &str = "1.0";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Caller-supplied inputs for contract construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContractRequest {
    /// Host profile name.
    pub host_profile: String,
    /// Runtime profile name.
    pub runtime_profile: String,
    /// Requested capability tokens.
    #[serde(default)]
    pub capabilities: Option<Vec<String>>,
    /// Optional tool allowlist.
    #[serde(default)]
    pub tool_allowlist: Option<Vec<String>>,
}

/// Validated, immutable session contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContract {
    /// Unique contract identifier.
    contract_id: ContractId,
    /// Contract schema version.
    contract_version: String,
    /// Creation timestamp (RFC 3339, UTC).
    created_at: String,
    /// Host profile name.
    host_profile: String,
    /// Runtime profile name.
    runtime_profile: String,
    /// Granted capabilities.
    capabilities: CapabilitySet,
    /// Optional tool allowlist.
    tool_allowlist: Option<BTreeSet<String>>,
}

impl SessionContract {
    /// Creates a contract stamped with a fresh identifier and the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when validation fails.
    pub fn create(request: ContractRequest) -> Result<Self, ContractError> {
        Self::create_at(request, ContractId::generate(), OffsetDateTime::now_utc())
    }

    /// Creates a contract with an explicit identifier and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when validation fails.
    pub fn create_at(
        request: ContractRequest,
        contract_id: ContractId,
        created_at: OffsetDateTime,
    ) -> Result<Self, ContractError> {
        let capabilities = validate_capabilities(&request.capabilities.unwrap_or_default())?;
        let created_at = created_at
            .format(&Rfc3339)
            .map_err(|err| ContractError::Timestamp(err.to_string()))?;
        Ok(Self {
            contract_id,
            contract_version: CONTRACT_VERSION.to_string(),
            created_at,
            host_profile: request.host_profile,
            runtime_profile: request.runtime_profile,
            capabilities,
            tool_allowlist: request.tool_allowlist.map(|tools| tools.into_iter().collect()),
        })
    }

    /// Returns the contract identifier.
    #[must_use]
    pub const fn contract_id(&self) -> &ContractId {
        &self.contract_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Returns the host profile name.
    #[must_use]
    pub fn host_profile(&self) -> &str {
        &self.host_profile
    }

    /// Returns the runtime profile name.
    #[must_use]
    pub fn runtime_profile(&self) -> &str {
        &self.runtime_profile
    }

    /// Returns the granted capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Returns the tool allowlist when one is set.
    #[must_use]
    pub const fn tool_allowlist(&self) -> Option<&BTreeSet<String>> {
        self.tool_allowlist.as_ref()
    }

    /// Returns true when the allowlist admits `tool` (or no allowlist is set).
    #[must_use]
    pub fn allows(&self, tool: &str) -> bool {
        self.tool_allowlist.as_ref().is_none_or(|allowlist| allowlist.contains(tool))
    }

    /// Resolves the contract's profile names against the registry.
    #[must_use]
    pub fn resolved(&self) -> ResolvedProfiles {
        resolve(&self.host_profile, &self.runtime_profile)
    }

    /// Returns the caller-facing view with resolved profiles attached.
    #[must_use]
    pub fn view(&self) -> ContractView<'_> {
        ContractView {
            contract: self,
            resolved: self.resolved(),
        }
    }
}

/// Caller-facing contract payload.
#[derive(Debug, Clone, Serialize)]
pub struct ContractView<'a> {
    /// Contract fields.
    #[serde(flatten)]
    pub contract: &'a SessionContract,
    /// Registry records for the contract's profile names.
    pub resolved: ResolvedProfiles,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Contract construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// Capability validation failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    /// Timestamp formatting failed.
    #[error("timestamp formatting failed: {0}")]
    Timestamp(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
