//! Mapping of HTTP failures to storage errors.

use lessondrive_core::storage::StorageError;
use reqwest::StatusCode;

use crate::model::ErrorEnvelope;

/// Error reasons Drive reports for quota and rate limits.
const QUOTA_REASONS: &[&str] = &[
    "storageQuotaExceeded",
    "quotaExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "dailyLimitExceeded",
    "sharingRateLimitExceeded",
];

/// Classify a transport-level failure.
pub(crate) fn from_reqwest(err: &reqwest::Error) -> StorageError {
    if err.is_timeout() {
        StorageError::timeout(err.to_string())
    } else if err.is_connect() || err.is_request() || err.is_body() {
        StorageError::connection(err.to_string())
    } else if err.is_decode() {
        StorageError::Decode(err.to_string())
    } else if err.is_builder() {
        StorageError::invalid_request(err.to_string())
    } else {
        StorageError::connection(err.to_string())
    }
}

/// Classify a non-success response from its status and body.
pub(crate) fn from_status(status: StatusCode, body: &str) -> StorageError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    let quota = envelope
        .as_ref()
        .is_some_and(|e| e.error.errors.iter().any(|d| QUOTA_REASONS.contains(&d.reason.as_str())));

    match status {
        StatusCode::UNAUTHORIZED => StorageError::unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => StorageError::QuotaExceeded(message),
        StatusCode::FORBIDDEN if quota => StorageError::QuotaExceeded(message),
        StatusCode::FORBIDDEN => StorageError::unauthorized(message),
        StatusCode::NOT_FOUND => StorageError::not_found(message),
        s if s.is_client_error() => StorageError::invalid_request(message),
        s => StorageError::backend(s.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn drive_error(code: u16, reason: &str, message: &str) -> String {
        serde_json::json!({
            "error": {
                "code": code,
                "message": message,
                "errors": [{ "domain": "usageLimits", "reason": reason, "message": message }]
            }
        })
        .to_string()
    }

    #[test]
    fn test_unauthorized() {
        let err = from_status(
            StatusCode::UNAUTHORIZED,
            &drive_error(401, "authError", "Invalid Credentials"),
        );
        assert!(matches!(err, StorageError::Unauthorized(ref m) if m == "Invalid Credentials"));
    }

    #[rstest]
    #[case("storageQuotaExceeded")]
    #[case("userRateLimitExceeded")]
    #[case("rateLimitExceeded")]
    fn test_forbidden_quota_reasons(#[case] reason: &str) {
        let err = from_status(StatusCode::FORBIDDEN, &drive_error(403, reason, "limit"));
        assert!(matches!(err, StorageError::QuotaExceeded(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_forbidden_without_quota_reason() {
        let err = from_status(
            StatusCode::FORBIDDEN,
            &drive_error(403, "insufficientFilePermissions", "no access"),
        );
        assert!(matches!(err, StorageError::Unauthorized(_)));
    }

    #[rstest]
    #[case(StatusCode::TOO_MANY_REQUESTS, "quota")]
    #[case(StatusCode::NOT_FOUND, "not_found")]
    #[case(StatusCode::BAD_REQUEST, "invalid")]
    #[case(StatusCode::CONFLICT, "invalid")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, "backend")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, "backend")]
    fn test_status_classification(#[case] status: StatusCode, #[case] kind: &str) {
        let err = from_status(status, "not json");
        let actual = match err {
            StorageError::QuotaExceeded(_) => "quota",
            StorageError::NotFound(_) => "not_found",
            StorageError::InvalidRequest(_) => "invalid",
            StorageError::Backend { .. } => "backend",
            _ => "other",
        };
        assert_eq!(actual, kind);
    }

    #[test]
    fn test_backend_error_keeps_status_and_falls_back_to_reason() {
        let err = from_status(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(
            err,
            StorageError::Backend { status: 502, ref message } if message == "Bad Gateway"
        ));
    }
}
