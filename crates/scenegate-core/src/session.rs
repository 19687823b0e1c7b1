// crates/scenegate-core/src/session.rs
// ============================================================================
// Module: Session Store
// Description: Keyed store of per-session contracts and runtime adapters.
// Purpose: Replace process-wide mutable state with explicit session scoping.
// Dependencies: crate::{contract, identifiers, runtime}
// ============================================================================

//! ## Overview
//! Each session holds at most one active contract and one active runtime
//! adapter. Sessions that never installed a contract observe no contract and
//! the store's default adapter.
//!
//! ## Linearization
//! A tool call observes exactly the contract and adapter present when
//! [`SessionStore::snapshot`] runs. [`SessionStore::install`] replaces both
//! under one write lock, so a concurrent install is either fully visible to
//! a snapshot or not at all. Handlers run against the snapshot and never
//! hold the lock across runtime I/O.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::contract::SessionContract;
use crate::identifiers::SessionKey;
use crate::runtime::SharedRuntime;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Point-in-time view of one session.
#[derive(Clone)]
pub struct SessionSnapshot {
    /// Active contract, if any.
    pub contract: Option<Arc<SessionContract>>,
    /// Active runtime adapter.
    pub runtime: SharedRuntime,
}

/// Stored session state.
struct SessionEntry {
    /// Active contract.
    contract: Arc<SessionContract>,
    /// Active runtime adapter.
    runtime: SharedRuntime,
    /// Install sequence number; lower is older.
    installed_seq: u64,
}

/// Session entries plus their install order.
#[derive(Default)]
struct SessionTable {
    /// Session entries keyed by session.
    entries: BTreeMap<SessionKey, SessionEntry>,
    /// Session keys ordered by install sequence.
    install_order: BTreeMap<u64, SessionKey>,
    /// Next install sequence number.
    next_seq: u64,
}

impl SessionTable {
    /// Removes the least recently installed session.
    fn evict_oldest(&mut self) -> Option<SessionKey> {
        let (_, key) = self.install_order.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

/// Result of installing a contract.
#[derive(Clone)]
pub struct InstallOutcome {
    /// The session as installed.
    pub snapshot: SessionSnapshot,
    /// Session evicted to stay within the limit, if any.
    pub evicted: Option<SessionKey>,
}

/// Keyed session store.
///
/// Holds at most `max_sessions` sessions; installing into a new session
/// when full evicts the least recently installed one.
pub struct SessionStore {
    /// Adapter observed by sessions without their own.
    default_runtime: SharedRuntime,
    /// Maximum number of tracked sessions (at least one).
    max_sessions: usize,
    /// Session table.
    sessions: RwLock<SessionTable>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(default_runtime: SharedRuntime, max_sessions: usize) -> Self {
        Self {
            default_runtime,
            max_sessions: max_sessions.max(1),
            sessions: RwLock::new(SessionTable::default()),
        }
    }

    /// Returns the adapter used by sessions without their own.
    #[must_use]
    pub fn default_runtime(&self) -> SharedRuntime {
        Arc::clone(&self.default_runtime)
    }

    /// Captures the session's contract and adapter.
    #[must_use]
    pub fn snapshot(&self, key: &SessionKey) -> SessionSnapshot {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.entries.get(key).map_or_else(
            || SessionSnapshot {
                contract: None,
                runtime: Arc::clone(&self.default_runtime),
            },
            |entry| SessionSnapshot {
                contract: Some(Arc::clone(&entry.contract)),
                runtime: Arc::clone(&entry.runtime),
            },
        )
    }

    /// Returns the session's active contract.
    #[must_use]
    pub fn active_contract(&self, key: &SessionKey) -> Option<Arc<SessionContract>> {
        self.snapshot(key).contract
    }

    /// Installs a contract, replacing any prior one for the session.
    ///
    /// When `runtime` is `None` the session keeps its current adapter. A new
    /// session arriving at a full store evicts the least recently installed
    /// session, which then observes no contract and the default adapter.
    pub fn install(
        &self,
        key: &SessionKey,
        contract: SessionContract,
        runtime: Option<SharedRuntime>,
    ) -> InstallOutcome {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let previous = sessions.entries.remove(key);
        let mut evicted = None;
        let existing_runtime = match previous {
            Some(entry) => {
                sessions.install_order.remove(&entry.installed_seq);
                Some(entry.runtime)
            }
            None => {
                if sessions.entries.len() >= self.max_sessions {
                    evicted = sessions.evict_oldest();
                }
                None
            }
        };
        let runtime = runtime
            .or(existing_runtime)
            .unwrap_or_else(|| Arc::clone(&self.default_runtime));
        let contract = Arc::new(contract);
        let installed_seq = sessions.next_seq;
        sessions.next_seq = sessions.next_seq.wrapping_add(1);
        sessions.install_order.insert(installed_seq, key.clone());
        sessions.entries.insert(
            key.clone(),
            SessionEntry {
                contract: Arc::clone(&contract),
                runtime: Arc::clone(&runtime),
                installed_seq,
            },
        );
        drop(sessions);
        InstallOutcome {
            snapshot: SessionSnapshot {
                contract: Some(contract),
                runtime,
            },
            evicted,
        }
    }

    /// Returns the number of sessions with an installed contract.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    /// Returns true when no session has an installed contract.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
