//! The sync engine.

use crate::coalesce::SingleFlight;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::policy::{CollectionRevisionPolicy, ReconcilePolicy, Reconciliation};
use crate::state::{CycleAction, SyncCycleResult, SyncState, SyncStats};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use taskrev_gateway::{GatewayError, RemoteGateway};
use taskrev_store::LocalStore;

/// The synchronizer: keeps a [`LocalStore`] and a [`RemoteGateway`]
/// eventually consistent using the collection revision as the
/// optimistic-concurrency token.
///
/// At most one cycle runs per engine at a time; a [`sync`](Self::sync)
/// call arriving while a cycle is in flight joins that cycle's result
/// rather than starting a second one.
pub struct SyncEngine<G: RemoteGateway, S: LocalStore> {
    config: SyncConfig,
    gateway: G,
    store: Arc<S>,
    policy: Box<dyn ReconcilePolicy>,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
    cancelled: AtomicBool,
    flight: SingleFlight<SyncResult<SyncCycleResult>>,
}

impl<G: RemoteGateway, S: LocalStore> SyncEngine<G, S> {
    /// Creates an engine with the default
    /// [`CollectionRevisionPolicy`].
    pub fn new(config: SyncConfig, gateway: G, store: Arc<S>) -> Self {
        Self {
            config,
            gateway,
            store,
            policy: Box::new(CollectionRevisionPolicy),
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
            cancelled: AtomicBool::new(false),
            flight: SingleFlight::new(),
        }
    }

    /// Replaces the reconciliation policy, builder style.
    #[must_use]
    pub fn with_policy(mut self, policy: impl ReconcilePolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// The store this engine synchronizes.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// A snapshot of the accumulated statistics.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Requests cancellation of the in-flight cycle.
    ///
    /// The cycle aborts at its next phase boundary. The store is never
    /// left partially overwritten: adopting a remote collection is one
    /// atomic store transaction.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Clears the cancellation flag.
    pub fn reset_cancel(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    fn check_cancelled(&self) -> SyncResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn set_state(&self, state: SyncState) {
        tracing::debug!(?state, "sync state");
        *self.state.write() = state;
    }

    /// Runs one sync cycle, or joins the one already in flight.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] describing why the cycle (own or
    /// joined) failed.
    pub fn sync(&self) -> SyncResult<SyncCycleResult> {
        let (result, joined) = self.flight.run(|| self.run_cycle());
        result.map(|mut cycle| {
            cycle.joined = joined;
            cycle
        })
    }

    /// Runs sync cycles with bounded exponential backoff on transient
    /// (network/server) failures. Auth, storage and exhausted-conflict
    /// failures surface immediately.
    ///
    /// # Errors
    ///
    /// Returns the final [`SyncError`] once attempts are exhausted or a
    /// non-retryable failure occurs.
    pub fn sync_with_retry(&self) -> SyncResult<SyncCycleResult> {
        let max_attempts = self.config.retry.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                self.set_state(SyncState::RetryWait);
                let delay = self.config.retry.backoff_for(attempt);
                tracing::debug!(attempt, ?delay, "waiting before retry");
                thread::sleep(delay);
                self.stats.write().retries += 1;
            }

            match self.sync() {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                    tracing::warn!(error = %e, attempt, "transient sync failure, will retry");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(SyncError::RetriesExhausted {
            attempts: max_attempts,
        }))
    }

    /// One full cycle: fetch, reconcile, then push or adopt, looping on
    /// push conflicts.
    fn run_cycle(&self) -> SyncResult<SyncCycleResult> {
        let start = Instant::now();
        self.reset_cancel();

        let result = self.cycle_inner(start);

        match &result {
            Ok(cycle) => {
                let mut stats = self.stats.write();
                stats.cycles_completed += 1;
                stats.last_error = None;
                match cycle.action {
                    CycleAction::AdoptedRemote { items } => stats.items_adopted += items as u64,
                    CycleAction::PushedLocal { items } => stats.items_pushed += items as u64,
                    CycleAction::NoChange => {}
                }
                self.set_state(SyncState::Idle);
            }
            Err(e) => {
                self.stats.write().last_error = Some(e.to_string());
                // Auth failures surface and the engine goes straight
                // back to idle: retrying without a new credential is
                // pointless. Cancellation is not a failure state.
                match e {
                    SyncError::Auth(_) | SyncError::Cancelled => self.set_state(SyncState::Idle),
                    _ => self.set_state(SyncState::Failed),
                }
            }
        }

        result
    }

    fn cycle_inner(&self, start: Instant) -> SyncResult<SyncCycleResult> {
        let mut rejected_pushes = 0u32;

        loop {
            self.check_cancelled()?;

            let local_revision = self.store.revision()?;
            self.set_state(SyncState::Fetching);
            let remote = self.gateway.fetch_list()?;
            self.check_cancelled()?;

            self.set_state(SyncState::Reconciling);
            match self.policy.reconcile(local_revision, &remote) {
                Reconciliation::AdoptRemote => {
                    let revision = remote.revision.unwrap_or_default();
                    self.store.replace_all(&remote.list, revision)?;
                    tracing::info!(
                        items = remote.list.len(),
                        revision,
                        "adopted remote collection"
                    );
                    return Ok(SyncCycleResult {
                        action: CycleAction::AdoptedRemote {
                            items: remote.list.len(),
                        },
                        revision: Some(revision),
                        joined: false,
                        duration: start.elapsed(),
                    });
                }
                Reconciliation::PushLocal => {
                    if !self.store.has_pending_changes()? {
                        tracing::debug!("collections already consistent");
                        return Ok(SyncCycleResult {
                            action: CycleAction::NoChange,
                            revision: local_revision,
                            joined: false,
                            duration: start.elapsed(),
                        });
                    }

                    let items = self.store.get_all()?;
                    let expected = local_revision.unwrap_or_default();
                    self.check_cancelled()?;

                    self.set_state(SyncState::Pushing);
                    match self.gateway.push_list(&items, expected) {
                        Ok(payload) => {
                            let revision = payload.revision.ok_or_else(|| {
                                SyncError::Protocol("push response carries no revision".into())
                            })?;
                            self.store.mark_synced(revision)?;
                            tracing::info!(
                                items = items.len(),
                                revision,
                                "pushed local collection"
                            );
                            return Ok(SyncCycleResult {
                                action: CycleAction::PushedLocal { items: items.len() },
                                revision: Some(revision),
                                joined: false,
                                duration: start.elapsed(),
                            });
                        }
                        Err(GatewayError::Conflict { .. }) => {
                            rejected_pushes += 1;
                            self.stats.write().conflicts += 1;
                            if rejected_pushes > self.config.conflict_retries {
                                return Err(SyncError::RetriesExhausted {
                                    attempts: rejected_pushes,
                                });
                            }
                            tracing::warn!(
                                rejected_pushes,
                                "push rejected on revision conflict, re-fetching"
                            );
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
    }
}

/// Runs a sync (with retry) on a worker thread and delivers the outcome
/// through `on_complete`, so a UI thread never blocks on the network.
///
/// Concurrent background requests against the same engine coalesce
/// through its single-flight gate.
pub fn sync_in_background<G, S, F>(
    engine: Arc<SyncEngine<G, S>>,
    on_complete: F,
) -> thread::JoinHandle<()>
where
    G: RemoteGateway + 'static,
    S: LocalStore + 'static,
    F: FnOnce(SyncResult<SyncCycleResult>) + Send + 'static,
{
    thread::spawn(move || {
        let outcome = engine.sync_with_retry();
        on_complete(outcome);
    })
}
