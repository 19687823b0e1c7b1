// crates/scenegate-mcp/src/registry.rs
// ============================================================================
// Module: Tool Registry
// Description: Name-indexed registry of tool contracts.
// Purpose: Hold exactly one contract per tool name for dispatch and listing.
// Dependencies: scenegate-contract, scenegate-core
// ============================================================================

//! ## Overview
//! The registry is built once at startup. Registration order is preserved
//! for listings, and a duplicate name fails construction.

use std::collections::BTreeMap;

use scenegate_contract::ToolContract;
use scenegate_contract::ToolDefinition;
use scenegate_contract::tool_contracts;
use scenegate_core::ToolGating;

/// Registry of tool contracts keyed by tool name.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    /// Contracts in registration order.
    contracts: Vec<ToolContract>,
    /// Index from tool name to position in `contracts`.
    index: BTreeMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Builds the registry from the canonical tool contracts.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when two contracts share a name.
    pub fn canonical() -> Result<Self, RegistryError> {
        Self::from_contracts(tool_contracts())
    }

    /// Builds a registry from explicit contracts.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] when two contracts share a name.
    pub fn from_contracts(contracts: Vec<ToolContract>) -> Result<Self, RegistryError> {
        let mut index = BTreeMap::new();
        for (position, contract) in contracts.iter().enumerate() {
            let name = contract.name.as_str();
            if index.insert(name, position).is_some() {
                return Err(RegistryError::DuplicateTool(name.to_string()));
            }
        }
        Ok(Self {
            contracts,
            index,
        })
    }

    /// Returns the contract registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolContract> {
        self.index.get(name).and_then(|position| self.contracts.get(*position))
    }

    /// Returns gating for `name`; unregistered names get contract-only gating.
    #[must_use]
    pub fn gating(&self, name: &str) -> ToolGating {
        self.get(name).map_or_else(|| ToolGating::for_name(name), |contract| contract.gating)
    }

    /// Returns all contracts in registration order.
    #[must_use]
    pub fn contracts(&self) -> &[ToolContract] {
        &self.contracts
    }

    /// Returns MCP tool definitions in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.contracts.iter().map(ToolDefinition::from).collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns true when no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// Registry construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two contracts share a tool name.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
}
