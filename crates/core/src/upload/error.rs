//! Upload error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Upload errors.
///
/// Only validation and the create step fail an upload. Placement repair and
/// the public-read grant are best-effort and never surface here.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File name is empty.
    #[error("file name is empty")]
    EmptyFileName,

    /// File too large.
    #[error("file too large: {size} bytes exceeds maximum {max} bytes")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// MIME type not allowed.
    #[error("MIME type '{0}' is not allowed")]
    MimeTypeNotAllowed(String),

    /// Backend refused to create the file.
    #[error("failed to create '{file_name}': {source}")]
    Create {
        /// Requested file name.
        file_name: String,
        /// Backend failure.
        #[source]
        source: StorageError,
    },
}

impl UploadError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create a create-step error.
    #[must_use]
    pub fn create(file_name: impl Into<String>, source: StorageError) -> Self {
        Self::Create {
            file_name: file_name.into(),
            source,
        }
    }
}

impl From<UploadError> for lessondrive_shared::AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Create { source, .. } => source.into(),
            other => Self::Validation(other.to_string()),
        }
    }
}
