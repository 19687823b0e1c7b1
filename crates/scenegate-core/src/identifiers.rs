// crates/scenegate-core/src/identifiers.rs
// ============================================================================
// Module: Scene Gate Identifiers
// Description: Canonical opaque identifiers for contracts and sessions.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! Contract identifiers are random UUID-v4 formatted strings minted at
//! contract creation. Session keys name the caller scope a contract is
//! installed into and are validated at the transport boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted session key length in bytes.
pub const MAX_SESSION_KEY_LEN: usize = 128;

// ============================================================================
// SECTION: Contract Identifier
// ============================================================================

/// Session contract identifier.
///
/// # Invariants
/// - Minted identifiers use the canonical 8-4-4-4-12 UUID-v4 layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    /// Creates a contract identifier from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh random UUID-v4 formatted identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; 16];
        OsRng.fill_bytes(&mut bytes);
        Self(format_uuid_v4(bytes))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContractId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Formats 16 random bytes as a version 4, variant 1 UUID string.
fn format_uuid_v4(mut bytes: [u8; 16]) -> String {
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    let mut out = String::with_capacity(36);
    for (index, byte) in bytes.iter().enumerate() {
        if matches!(index, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

// ============================================================================
// SECTION: Session Key
// ============================================================================

/// Key naming one caller session in the session store.
///
/// # Invariants
/// - Non-empty, at most [`MAX_SESSION_KEY_LEN`] bytes.
/// - Only ASCII alphanumerics, `-`, `_`, `.`, and `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Session key used when an HTTP caller supplies none.
    pub const DEFAULT: &'static str = "default";
    /// Session key used by the stdio transport.
    pub const STDIO: &'static str = "stdio";

    /// Parses and validates a session key.
    ///
    /// # Errors
    ///
    /// Returns [`SessionKeyError`] when the key is empty, too long, or
    /// contains disallowed characters.
    pub fn parse(raw: &str) -> Result<Self, SessionKeyError> {
        if raw.is_empty() {
            return Err(SessionKeyError::Empty);
        }
        if raw.len() > MAX_SESSION_KEY_LEN {
            return Err(SessionKeyError::TooLong(raw.len()));
        }
        if let Some(bad) =
            raw.chars().find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':')))
        {
            return Err(SessionKeyError::InvalidChar(bad));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the default HTTP session key.
    #[must_use]
    pub fn default_session() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// Returns the stdio session key.
    #[must_use]
    pub fn stdio() -> Self {
        Self(Self::STDIO.to_string())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session key validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionKeyError {
    /// Key was empty.
    #[error("session key must not be empty")]
    Empty,
    /// Key exceeded the length limit.
    #[error("session key too long ({0} bytes, max {MAX_SESSION_KEY_LEN})")]
    TooLong(usize),
    /// Key contained a disallowed character.
    #[error("session key contains invalid character '{0}'")]
    InvalidChar(char),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
