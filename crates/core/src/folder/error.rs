//! Folder resolution error types.

use std::sync::Arc;

use thiserror::Error;

use crate::storage::StorageError;

/// Folder resolution errors.
#[derive(Debug, Clone, Error)]
pub enum ResolutionError {
    /// A segment could not be looked up or created.
    #[error("failed to resolve folder '{segment}' at position {position}: {source}")]
    Segment {
        /// Trimmed segment name.
        segment: String,
        /// Index of the segment in the requested path.
        position: usize,
        /// Backend failure, shared by every caller of the same flight.
        #[source]
        source: Arc<StorageError>,
    },

    /// The path had no usable segments and no root folder is configured.
    #[error("folder path is empty and no root folder is configured")]
    EmptyPath,
}

impl ResolutionError {
    /// Create a segment error.
    #[must_use]
    pub fn segment(segment: impl Into<String>, position: usize, source: Arc<StorageError>) -> Self {
        Self::Segment {
            segment: segment.into(),
            position,
            source,
        }
    }

    /// The backend error behind this failure, if any.
    #[must_use]
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            Self::Segment { source, .. } => Some(source),
            Self::EmptyPath => None,
        }
    }
}

impl From<ResolutionError> for lessondrive_shared::AppError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Segment { source, .. } => Arc::unwrap_or_clone(source).into(),
            ResolutionError::EmptyPath => Self::Validation(ResolutionError::EmptyPath.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessondrive_shared::AppError;

    #[test]
    fn test_segment_error_display() {
        let err = ResolutionError::segment(
            "Subject B",
            1,
            Arc::new(StorageError::unauthorized("expired")),
        );
        assert_eq!(
            err.to_string(),
            "failed to resolve folder 'Subject B' at position 1: unauthorized: expired"
        );
        assert!(matches!(
            err.storage_error(),
            Some(StorageError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_into_app_error() {
        let err = ResolutionError::segment("x", 0, Arc::new(StorageError::connection("reset")));
        assert_eq!(AppError::from(err).status_code(), 503);
        assert_eq!(AppError::from(ResolutionError::EmptyPath).status_code(), 400);
    }
}
