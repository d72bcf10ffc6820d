//! Storage error types.

use thiserror::Error;

/// Errors reported by a remote storage backend.
///
/// `Timeout` and `Connection` are transient and retried by
/// [`RetryPolicy`](super::RetryPolicy). Everything else is permanent.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection could not be established or was reset (includes DNS failures).
    #[error("connection failed: {0}")]
    Connection(String),

    /// Backend rejected the credentials or denied access.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Storage quota or rate limit exhausted.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Backend rejected the request as invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Object not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend answered with an unexpected status.
    #[error("backend error ({status}): {message}")]
    Backend {
        /// HTTP status reported by the backend.
        status: u16,
        /// Backend-provided message.
        message: String,
    },

    /// Backend response could not be decoded.
    #[error("failed to decode backend response: {0}")]
    Decode(String),

    /// Transient failures persisted past the retry budget.
    #[error("{operation} failed after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Name of the retried operation.
        operation: String,
        /// Total attempts made.
        attempts: u32,
        /// Error from the final attempt.
        last: Box<StorageError>,
    },
}

impl StorageError {
    /// Create a timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create an unauthorized error.
    #[must_use]
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a backend status error.
    #[must_use]
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}

impl From<StorageError> for lessondrive_shared::AppError {
    fn from(err: StorageError) -> Self {
        use lessondrive_shared::AppError;

        match err {
            StorageError::Unauthorized(msg) => AppError::Unauthorized(msg),
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::Timeout(_)
            | StorageError::Connection(_)
            | StorageError::RetryExhausted { .. } => AppError::Unavailable(err.to_string()),
            StorageError::QuotaExceeded(_)
            | StorageError::InvalidRequest(_)
            | StorageError::Backend { .. }
            | StorageError::Decode(_) => AppError::ExternalService(err.to_string()),
        }
    }
}
