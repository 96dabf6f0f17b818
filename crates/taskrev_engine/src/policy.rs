//! Reconciliation policy.
//!
//! The policy decides what a cycle does with a fetched remote
//! collection; the engine's control flow does not change when the
//! policy is swapped for a finer-grained scheme.

use taskrev_model::ListPayload;

/// Outcome of comparing local and remote sync state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Local and remote agree; local pending changes may be pushed.
    PushLocal,
    /// Remote has advanced (or local state is unestablished); the
    /// remote collection replaces the local one.
    AdoptRemote,
}

/// Decides between pushing local changes and adopting the remote
/// collection.
pub trait ReconcilePolicy: Send + Sync {
    /// Compares the local revision marker against a fetched payload.
    fn reconcile(&self, local_revision: Option<u64>, remote: &ListPayload) -> Reconciliation;
}

/// Collection-level optimistic concurrency over a single revision
/// counter.
///
/// Equal revisions mean the backend has not moved since the last sync,
/// so local pending changes may be pushed against that revision.
/// Anything else - a differing remote revision, a first run with no
/// local marker, or a payload without a revision - adopts the remote
/// collection wholesale: last-remote-wins at collection granularity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionRevisionPolicy;

impl ReconcilePolicy for CollectionRevisionPolicy {
    fn reconcile(&self, local_revision: Option<u64>, remote: &ListPayload) -> Reconciliation {
        match (local_revision, remote.revision) {
            (Some(local), Some(remote)) if local == remote => Reconciliation::PushLocal,
            _ => Reconciliation::AdoptRemote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(revision: Option<u64>) -> ListPayload {
        ListPayload {
            status: Some("ok".into()),
            list: Vec::new(),
            revision,
        }
    }

    #[test]
    fn equal_revisions_push_local() {
        let policy = CollectionRevisionPolicy;
        assert_eq!(
            policy.reconcile(Some(5), &payload(Some(5))),
            Reconciliation::PushLocal
        );
    }

    #[test]
    fn remote_advance_adopts_remote() {
        let policy = CollectionRevisionPolicy;
        assert_eq!(
            policy.reconcile(Some(5), &payload(Some(7))),
            Reconciliation::AdoptRemote
        );
    }

    #[test]
    fn first_run_adopts_remote() {
        let policy = CollectionRevisionPolicy;
        assert_eq!(
            policy.reconcile(None, &payload(Some(0))),
            Reconciliation::AdoptRemote
        );
    }

    #[test]
    fn missing_remote_revision_adopts_remote() {
        let policy = CollectionRevisionPolicy;
        assert_eq!(
            policy.reconcile(Some(5), &payload(None)),
            Reconciliation::AdoptRemote
        );
    }
}
