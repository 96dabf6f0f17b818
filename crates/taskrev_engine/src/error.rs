//! Error types for the synchronizer.

use taskrev_gateway::GatewayError;
use taskrev_store::StoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a sync cycle.
///
/// Every variant is cheaply cloneable so a coalesced caller can receive
/// the same outcome as the cycle leader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The local store failed. Fatal for this cycle.
    #[error("storage error: {0}")]
    Storage(String),

    /// The backend was unreachable or timed out. Retryable.
    #[error("network error: {0}")]
    Network(String),

    /// The credential was rejected. Surfaced immediately, never
    /// auto-retried.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The backend's revision moved past the expected one.
    /// Resolved internally by re-fetching; surfaces only through
    /// [`SyncError::RetriesExhausted`].
    #[error("revision conflict: expected {expected}")]
    Conflict {
        /// The revision the rejected push carried.
        expected: u64,
    },

    /// The backend failed. Retryable with backoff.
    #[error("server error: status {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// The exchange could not be interpreted. Not retryable.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The cycle was cancelled before completing.
    #[error("sync cancelled")]
    Cancelled,

    /// The conflict re-fetch loop ran out of attempts. The store is
    /// unchanged from the start of the cycle.
    #[error("sync retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        /// Number of rejected pushes.
        attempts: u32,
    },
}

impl SyncError {
    /// Returns true if a later cycle may succeed without intervention.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Network(_) | SyncError::Server { .. })
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::Storage(e.to_string())
    }
}

impl From<GatewayError> for SyncError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Network { message } => SyncError::Network(message),
            GatewayError::Auth(message) => SyncError::Auth(message),
            GatewayError::Conflict { expected } => SyncError::Conflict { expected },
            GatewayError::Server { status, message } => SyncError::Server { status, message },
            GatewayError::Protocol(message) => SyncError::Protocol(message),
        }
    }
}
