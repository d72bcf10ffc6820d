//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Remote drive backend configuration.
    pub drive: DriveConfig,
    /// Upload and public URL configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Retry policy for remote calls.
    #[serde(default)]
    pub retry: RetrySettings,
    /// Folder resolution cache configuration.
    #[serde(default)]
    pub folder_cache: FolderCacheSettings,
}

/// Remote drive configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    /// Folder used as the parent of the first path segment.
    ///
    /// `None` places top-level folders under the backend's default root.
    #[serde(default)]
    pub root_folder_id: Option<String>,
    /// Backend provider.
    pub provider: DriveProvider,
}

/// Remote drive provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DriveProvider {
    /// Google Drive v3 REST API.
    Google {
        /// OAuth2 bearer token, issued outside this service.
        access_token: String,
        /// Metadata API base URL.
        #[serde(default = "default_api_base")]
        api_base: String,
        /// Media upload API base URL.
        #[serde(default = "default_upload_base")]
        upload_base: String,
        /// Per-request timeout in seconds.
        #[serde(default = "default_request_timeout")]
        request_timeout_secs: u64,
    },
    /// In-process drive (development only).
    Memory,
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_upload_base() -> String {
    "https://www.googleapis.com/upload/drive/v3".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl DriveProvider {
    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google { .. } => "google",
            Self::Memory => "memory",
        }
    }
}

/// Upload and public URL settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Path of the image proxy endpoint (e.g. `/api/drive/image`).
    #[serde(default = "default_proxy_path")]
    pub proxy_path: String,
    /// Host used for direct view links.
    #[serde(default = "default_backend_host")]
    pub backend_host: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed MIME types. Empty allows everything.
    #[serde(default)]
    pub allowed_mime_types: Vec<String>,
}

fn default_proxy_path() -> String {
    "/api/drive/image".to_string()
}

fn default_backend_host() -> String {
    "https://drive.google.com".to_string()
}

fn default_max_file_size() -> u64 {
    25 * 1024 * 1024 // 25MB
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            proxy_path: default_proxy_path(),
            backend_host: default_backend_host(),
            max_file_size: default_max_file_size(),
            allowed_mime_types: Vec::new(),
        }
    }
}

/// Retry settings for remote calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound for a single backoff delay in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Folder resolution cache settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderCacheSettings {
    /// Time-to-live for resolved folders. `None` keeps them for the process lifetime.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
    /// Maximum number of cached folders. `None` is unbounded.
    #[serde(default)]
    pub max_capacity: Option<u64>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::layered(
            config::File::with_name("config/default").required(false),
            config::File::with_name(&format!("config/{run_mode}")).required(false),
            Self::environment(),
        )
    }

    /// `LESSONDRIVE__SECTION__KEY` variables, e.g. `LESSONDRIVE__RETRY__MAX_RETRIES`.
    fn environment() -> config::Environment {
        config::Environment::with_prefix("LESSONDRIVE")
            .separator("__")
            .try_parsing(true)
    }

    /// Defaults, then the run-mode file, then the environment. Later layers win.
    fn layered<D, M>(
        defaults: D,
        run_mode: M,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError>
    where
        D: config::Source + Send + Sync + 'static,
        M: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(defaults)
            .add_source(run_mode)
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
