//! Sync state, statistics and cycle results.

use std::time::Duration;

/// The current phase of the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Not syncing.
    Idle,
    /// Fetching the remote collection.
    Fetching,
    /// Deciding between push and adopt.
    Reconciling,
    /// Pushing local pending changes.
    Pushing,
    /// Waiting before retrying a transient failure.
    RetryWait,
    /// The last cycle failed on a transient error; a later cycle may
    /// start from here.
    Failed,
}

impl SyncState {
    /// Returns true while a cycle is actively working.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncState::Fetching | SyncState::Reconciling | SyncState::Pushing
        )
    }

    /// Returns true if a new cycle can start from this state.
    #[must_use]
    pub fn can_start_sync(&self) -> bool {
        matches!(self, SyncState::Idle | SyncState::Failed)
    }
}

/// Counters accumulated across an engine's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Completed sync cycles.
    pub cycles_completed: u64,
    /// Items written to the store by remote adoptions.
    pub items_adopted: u64,
    /// Items sent to the backend by pushes.
    pub items_pushed: u64,
    /// Pushes rejected with a revision conflict.
    pub conflicts: u64,
    /// Transient-failure retries.
    pub retries: u64,
    /// Message of the most recent failure, cleared on success.
    pub last_error: Option<String>,
}

/// What a completed sync cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleAction {
    /// Local and remote were already consistent; nothing moved.
    NoChange,
    /// The remote collection replaced local contents.
    AdoptedRemote {
        /// Items now in the store.
        items: usize,
    },
    /// Local pending changes were pushed.
    PushedLocal {
        /// Items sent to the backend.
        items: usize,
    },
}

/// Result of a successful sync cycle.
#[derive(Debug, Clone)]
pub struct SyncCycleResult {
    /// What the cycle did.
    pub action: CycleAction,
    /// The revision marker after the cycle.
    pub revision: Option<u64>,
    /// True when this caller joined a cycle started by another caller
    /// rather than running one itself.
    pub joined: bool,
    /// Wall-clock duration of the cycle.
    pub duration: Duration,
}
