//! Error types for gateway operations.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend was unreachable or the request timed out. Retryable.
    #[error("network error: {message}")]
    Network {
        /// Transport-level failure description.
        message: String,
    },

    /// The credential was rejected (401/403). Fatal until
    /// re-authenticated; never auto-retried.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The backend's revision did not match the expected one (409).
    /// The caller must re-fetch and retry.
    #[error("revision conflict: expected {expected}")]
    Conflict {
        /// The revision the request carried.
        expected: u64,
    },

    /// The backend failed (5xx). Retryable with backoff.
    #[error("server error: status {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// The response could not be interpreted. Not retryable.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl GatewayError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Returns true if a caller may retry the failed request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Network { .. } | GatewayError::Server { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(GatewayError::network("connection refused").is_retryable());
        assert!(GatewayError::Server {
            status: 503,
            message: String::new(),
        }
        .is_retryable());
        assert!(!GatewayError::Auth("bad token".into()).is_retryable());
        assert!(!GatewayError::Conflict { expected: 5 }.is_retryable());
        assert!(!GatewayError::Protocol("truncated body".into()).is_retryable());
    }
}
