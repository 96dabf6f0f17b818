//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
///
/// Reads are retryable from the caller's point of view; a failed write
/// is fatal for the enclosing sync cycle.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The persisted snapshot is unreadable.
    #[error("store corrupted: {0}")]
    Corrupted(String),

    /// Snapshot encoding or decoding failed.
    #[error("snapshot codec error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Another process holds the store.
    #[error("store locked: another process has exclusive access")]
    Locked,
}
