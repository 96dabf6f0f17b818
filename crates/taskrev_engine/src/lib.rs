//! # Taskrev Engine
//!
//! Synchronizer for taskrev: reconciles the local store with the remote
//! gateway using the collection revision as a single optimistic-
//! concurrency token.
//!
//! This crate provides:
//! - Sync state machine (idle → fetching → reconciling → pushing → idle)
//! - Swappable reconciliation policy ([`CollectionRevisionPolicy`])
//! - Conflict re-fetch loop and retry with exponential backoff
//! - Single-flight coalescing of concurrent sync requests
//! - Cancellation and background execution with callback delivery
//!
//! ## Architecture
//!
//! A sync cycle fetches the remote collection first, then lets the
//! policy decide between two outcomes:
//! 1. Revisions match: push local pending changes, if any
//! 2. Revisions differ: adopt the remote collection wholesale
//!    (last-remote-wins at collection granularity)
//!
//! ## Key Invariants
//!
//! - At most one cycle runs per engine; concurrent callers join the
//!   in-flight cycle's result
//! - Adopting a remote collection is one atomic store transaction
//! - A cycle that exhausts its conflict retries leaves the store
//!   unchanged
//! - Auth failures surface immediately and are never auto-retried

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod coalesce;
mod config;
mod engine;
mod error;
mod policy;
mod state;

pub use config::{RetryConfig, SyncConfig};
pub use engine::{sync_in_background, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use policy::{CollectionRevisionPolicy, ReconcilePolicy, Reconciliation};
pub use state::{CycleAction, SyncCycleResult, SyncState, SyncStats};
