// crates/scenegate-core/src/capability.rs
// ============================================================================
// Module: Capability Model
// Description: Closed capability token set and implication graph.
// Purpose: Validate requested capabilities before a contract is constructed.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Capabilities are a closed, versioned set of tokens granted by a session
//! contract. Some capabilities imply others; the implication graph is an
//! explicit table rather than hard-coded checks so new tokens extend it
//! without touching the validator.
//!
//! ## Invariants
//! - A [`CapabilitySet`] is only produced by [`validate_capabilities`].
//! - Every set satisfies every edge in [`CAPABILITY_IMPLICATIONS`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Version of the capability token set.
pub const CAPABILITIES_VERSION: &str = "1.0";

/// Implication edges: holding the first capability requires the second.
pub const CAPABILITY_IMPLICATIONS: &[(Capability, Capability)] =
    &[(Capability::UiLive, Capability::DataOnly)];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Capability token granted by a session contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// Read-only access to runtime data.
    DataOnly,
    /// Live interaction with the host user interface.
    UiLive,
}

impl Capability {
    /// Returns the canonical token string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataOnly => "DATA_ONLY",
            Self::UiLive => "UI_LIVE",
        }
    }

    /// Returns every capability in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::DataOnly, Self::UiLive]
    }

    /// Parses a capability token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "DATA_ONLY" => Some(Self::DataOnly),
            "UI_LIVE" => Some(Self::UiLive),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated set of capabilities held by a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// Returns an empty capability set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns true when the set holds `capability`.
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Returns the capabilities from `required` not present in this set.
    #[must_use]
    pub fn missing(&self, required: &[Capability]) -> Vec<Capability> {
        required.iter().copied().filter(|cap| !self.contains(*cap)).collect()
    }

    /// Iterates the capabilities in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of capabilities held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no capability is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the token strings in canonical order.
    #[must_use]
    pub fn tokens(&self) -> Vec<&'static str> {
        self.iter().map(Capability::as_str).collect()
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates raw capability tokens into a [`CapabilitySet`].
///
/// Unknown tokens are reported together before implication edges are
/// checked. Duplicate tokens collapse.
///
/// # Errors
///
/// Returns [`CapabilityError::Unknown`] naming every unrecognized token, or
/// [`CapabilityError::MissingImplied`] for the first violated implication.
pub fn validate_capabilities<S: AsRef<str>>(tokens: &[S]) -> Result<CapabilitySet, CapabilityError> {
    let mut set = BTreeSet::new();
    let mut unknown: Vec<String> = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        match Capability::parse(token) {
            Some(capability) => {
                set.insert(capability);
            }
            None => {
                if !unknown.iter().any(|seen| seen == token) {
                    unknown.push(token.to_string());
                }
            }
        }
    }
    if !unknown.is_empty() {
        return Err(CapabilityError::Unknown(unknown));
    }
    for (implying, implied) in CAPABILITY_IMPLICATIONS {
        if set.contains(implying) && !set.contains(implied) {
            return Err(CapabilityError::MissingImplied {
                implying: *implying,
                implied: *implied,
            });
        }
    }
    Ok(CapabilitySet(set))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Capability validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// One or more tokens are outside the closed set.
    #[error("unknown capabilities: {}", .0.join(", "))]
    Unknown(Vec<String>),
    /// A capability is held without a capability it implies.
    #[error("{implying} requires {implied} capability.")]
    MissingImplied {
        /// Capability that carries the implication.
        implying: Capability,
        /// Capability that must accompany it.
        implied: Capability,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use super::Capability;
    use super::CapabilityError;
    use super::validate_capabilities;

    #[test]
    fn ui_live_without_data_only_is_rejected() {
        let err = validate_capabilities(&["UI_LIVE"]).unwrap_err();
        assert_eq!(err.to_string(), "UI_LIVE requires DATA_ONLY capability.");
    }

    #[test]
    fn ui_live_with_data_only_is_accepted() {
        let set = validate_capabilities(&["UI_LIVE", "DATA_ONLY"]).unwrap();
        assert_eq!(set.tokens(), vec!["DATA_ONLY", "UI_LIVE"]);
    }

    #[test]
    fn unknown_tokens_are_all_named() {
        let err = validate_capabilities(&["DATA_ONLY", "WRITE", "ADMIN", "WRITE"]).unwrap_err();
        assert_eq!(err, CapabilityError::Unknown(vec!["WRITE".to_string(), "ADMIN".to_string()]));
        assert!(err.to_string().contains("WRITE"));
        assert!(err.to_string().contains("ADMIN"));
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let set = validate_capabilities::<&str>(&[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.missing(&[Capability::DataOnly]), vec![Capability::DataOnly]);
    }

    #[test]
    fn duplicates_collapse() {
        let set = validate_capabilities(&["DATA_ONLY", "DATA_ONLY"]).unwrap();
        assert_eq!(set.len(), 1);
    }
}
