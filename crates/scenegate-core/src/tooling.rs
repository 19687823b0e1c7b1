// crates/scenegate-core/src/tooling.rs
// ============================================================================
// Module: Tooling Identifiers
// Description: Canonical tool identifiers and gating metadata for Scene Gate.
// Purpose: Shared tool naming across contracts, the gate, and the dispatcher.
// Dependencies: crate::capability, serde
// ============================================================================

//! ## Overview
//! Canonical tool identifiers used by Scene Gate. These names are part of the
//! external contract surface. Each tool carries static gating metadata that
//! the gate evaluator consults.

use std::fmt;

use serde::Serialize;

use crate::capability::Capability;

/// Canonical tool names for Scene Gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ToolName {
    /// Report gateway health.
    #[serde(rename = "system.health")]
    SystemHealth,
    /// Echo caller-supplied text.
    #[serde(rename = "echo")]
    Echo,
    /// Create and install a session contract.
    #[serde(rename = "contract.create")]
    ContractCreate,
    /// Fetch the active session contract.
    #[serde(rename = "contract.get")]
    ContractGet,
    /// List registered tools with gating metadata.
    #[serde(rename = "system.tools_catalog")]
    ToolsCatalog,
    /// List files under the configured workspace root.
    #[serde(rename = "workspace.list_files")]
    WorkspaceListFiles,
    /// Probe the active runtime backend.
    #[serde(rename = "runtime.probe")]
    RuntimeProbe,
    /// List scene objects from the active runtime backend.
    #[serde(rename = "scene.list_objects")]
    SceneListObjects,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SystemHealth => "system.health",
            Self::Echo => "echo",
            Self::ContractCreate => "contract.create",
            Self::ContractGet => "contract.get",
            Self::ToolsCatalog => "system.tools_catalog",
            Self::WorkspaceListFiles => "workspace.list_files",
            Self::RuntimeProbe => "runtime.probe",
            Self::SceneListObjects => "scene.list_objects",
        }
    }

    /// Returns all Scene Gate tool names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SystemHealth,
            Self::Echo,
            Self::ContractCreate,
            Self::ContractGet,
            Self::ToolsCatalog,
            Self::WorkspaceListFiles,
            Self::RuntimeProbe,
            Self::SceneListObjects,
        ]
    }

    /// Parses a tool name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|tool| tool.as_str() == name)
    }

    /// Returns the static gating metadata for the tool.
    #[must_use]
    pub const fn gating(self) -> ToolGating {
        match self {
            Self::SystemHealth
            | Self::Echo
            | Self::ContractCreate
            | Self::ContractGet
            | Self::ToolsCatalog => ToolGating::UNGATED,
            Self::WorkspaceListFiles => ToolGating::CONTRACT_ONLY,
            Self::RuntimeProbe | Self::SceneListObjects => ToolGating::RUNTIME_DATA,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Gating metadata attached to a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolGating {
    /// Tool requires an active session contract.
    pub requires_contract: bool,
    /// Capabilities the contract must hold.
    pub required_capabilities: &'static [Capability],
    /// Tool is subject to the contract allowlist.
    pub allowlist_respected: bool,
    /// Tool consults the runtime adapter.
    pub runtime_backed: bool,
}

impl ToolGating {
    /// Always-allowed tools.
    pub const UNGATED: Self = Self {
        requires_contract: false,
        required_capabilities: &[],
        allowlist_respected: false,
        runtime_backed: false,
    };

    /// Contract-gated tools with no capability requirement.
    ///
    /// Also applied to unregistered tool names.
    pub const CONTRACT_ONLY: Self = Self {
        requires_contract: true,
        required_capabilities: &[],
        allowlist_respected: true,
        runtime_backed: false,
    };

    /// Runtime-backed read-only data tools.
    pub const RUNTIME_DATA: Self = Self {
        requires_contract: true,
        required_capabilities: &[Capability::DataOnly],
        allowlist_respected: true,
        runtime_backed: true,
    };

    /// Returns gating metadata for a raw tool name.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        ToolName::parse(name).map_or(Self::CONTRACT_ONLY, ToolName::gating)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
