//! Drive client configuration.

use std::fmt;
use std::time::Duration;

use lessondrive_shared::{AppError, DriveProvider};

/// Connection settings for [`DriveClient`](crate::DriveClient).
#[derive(Clone)]
pub struct DriveClientConfig {
    /// OAuth2 bearer token.
    pub access_token: String,
    /// Metadata API base URL.
    pub api_base: String,
    /// Media upload API base URL.
    pub upload_base: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl DriveClientConfig {
    /// Default metadata API base.
    pub const DEFAULT_API_BASE: &'static str = "https://www.googleapis.com/drive/v3";
    /// Default upload API base.
    pub const DEFAULT_UPLOAD_BASE: &'static str = "https://www.googleapis.com/upload/drive/v3";
    /// Default per-request timeout: 60 seconds.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Config for the public Google endpoints.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            upload_base: Self::DEFAULT_UPLOAD_BASE.to_string(),
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Point both APIs at `base` (used against mock servers).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.api_base = format!("{base}/drive/v3");
        self.upload_base = format!("{base}/upload/drive/v3");
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl TryFrom<&DriveProvider> for DriveClientConfig {
    type Error = AppError;

    fn try_from(provider: &DriveProvider) -> Result<Self, Self::Error> {
        match provider {
            DriveProvider::Google {
                access_token,
                api_base,
                upload_base,
                request_timeout_secs,
            } => {
                if access_token.trim().is_empty() {
                    return Err(AppError::Configuration(
                        "drive.provider.access_token is empty".into(),
                    ));
                }
                Ok(Self {
                    access_token: access_token.clone(),
                    api_base: api_base.trim_end_matches('/').to_string(),
                    upload_base: upload_base.trim_end_matches('/').to_string(),
                    request_timeout: Duration::from_secs(*request_timeout_secs),
                })
            }
            other => Err(AppError::Configuration(format!(
                "provider '{}' is not a Google Drive provider",
                other.name()
            ))),
        }
    }
}

impl fmt::Debug for DriveClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveClientConfig")
            .field("access_token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("upload_base", &self.upload_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriveClientConfig::new("tok");
        assert_eq!(config.api_base, "https://www.googleapis.com/drive/v3");
        assert_eq!(config.upload_base, "https://www.googleapis.com/upload/drive/v3");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_with_base_url() {
        let config = DriveClientConfig::new("tok").with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.api_base, "http://127.0.0.1:1234/drive/v3");
        assert_eq!(config.upload_base, "http://127.0.0.1:1234/upload/drive/v3");
    }

    #[test]
    fn test_from_google_provider() {
        let provider = DriveProvider::Google {
            access_token: "ya29.token".into(),
            api_base: "https://drive.test/v3/".into(),
            upload_base: "https://drive.test/upload/v3".into(),
            request_timeout_secs: 5,
        };

        let config = DriveClientConfig::try_from(&provider).expect("valid provider");
        assert_eq!(config.api_base, "https://drive.test/v3");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_memory_provider_and_empty_token() {
        let err = DriveClientConfig::try_from(&DriveProvider::Memory).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));

        let provider = DriveProvider::Google {
            access_token: "  ".into(),
            api_base: DriveClientConfig::DEFAULT_API_BASE.into(),
            upload_base: DriveClientConfig::DEFAULT_UPLOAD_BASE.into(),
            request_timeout_secs: 60,
        };
        assert!(DriveClientConfig::try_from(&provider).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", DriveClientConfig::new("secret-token"));
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
