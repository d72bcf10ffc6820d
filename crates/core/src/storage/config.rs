//! Upload configuration types.

use lessondrive_shared::config::StorageSettings;

/// Upload and public URL configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the image proxy endpoint.
    pub proxy_path: String,
    /// Host used for direct view links.
    pub backend_host: String,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types. Empty allows everything.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default proxy path.
    pub const DEFAULT_PROXY_PATH: &'static str = "/api/drive/image";
    /// Default backend host for direct links.
    pub const DEFAULT_BACKEND_HOST: &'static str = "https://drive.google.com";
    /// Default max file size: 25MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            proxy_path: Self::DEFAULT_PROXY_PATH.to_string(),
            backend_host: Self::DEFAULT_BACKEND_HOST.to_string(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Vec::new(),
        }
    }

    /// Set the image proxy path.
    #[must_use]
    pub fn with_proxy_path(mut self, path: impl Into<String>) -> Self {
        self.proxy_path = path.into();
        self
    }

    /// Set the backend host used for direct links.
    #[must_use]
    pub fn with_backend_host(mut self, host: impl Into<String>) -> Self {
        self.backend_host = host.into();
        self
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set allowed MIME types.
    #[must_use]
    pub fn with_allowed_mime_types(mut self, types: Vec<String>) -> Self {
        self.allowed_mime_types = types;
        self
    }

    /// Check if a MIME type is allowed. An empty allow-list accepts everything.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.is_empty()
            || self
                .allowed_mime_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(mime_type))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&StorageSettings> for StorageConfig {
    fn from(settings: &StorageSettings) -> Self {
        Self::new()
            .with_proxy_path(&settings.proxy_path)
            .with_backend_host(&settings.backend_host)
            .with_max_file_size(settings.max_file_size)
            .with_allowed_mime_types(settings.allowed_mime_types.clone())
    }
}
