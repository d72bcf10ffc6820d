//! Request-coalescing cache for folder resolution using Moka.
//!
//! Concurrent callers asking for the same key share one in-flight lookup.
//! Successful results stay cached; failures are never stored, so the next
//! caller starts a fresh attempt.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use lessondrive_shared::FolderId;
use lessondrive_shared::config::FolderCacheSettings;
use moka::future::Cache;

use super::path::FolderKey;

/// Cache sizing and expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderCacheConfig {
    /// Expire entries this long after insertion. `None` keeps them forever.
    pub ttl: Option<Duration>,
    /// Maximum entries. `None` is unbounded.
    pub max_capacity: Option<u64>,
}

impl From<&FolderCacheSettings> for FolderCacheConfig {
    fn from(settings: &FolderCacheSettings) -> Self {
        Self {
            ttl: settings.ttl_secs.map(Duration::from_secs),
            max_capacity: settings.max_capacity,
        }
    }
}

/// Single-flight map from key to a shared result.
pub struct SingleFlight<K, V> {
    cache: Cache<K, V>,
}

/// Single-flight cache of resolved folders.
pub type FolderCache = SingleFlight<FolderKey, FolderId>;

impl<K, V> SingleFlight<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates an unbounded cache without expiry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FolderCacheConfig::default())
    }

    /// Creates a cache with custom sizing and expiry.
    #[must_use]
    pub fn with_config(config: FolderCacheConfig) -> Self {
        let mut builder = Cache::builder();
        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            cache: builder.build(),
        }
    }

    /// Returns the cached value for `key`, or runs `factory` to produce it.
    ///
    /// If another caller is already running a factory for `key`, this joins
    /// that flight instead of starting a second one. A failed flight is not
    /// cached; every caller waiting on it receives the same error.
    pub async fn get_or_create<F, E>(&self, key: K, factory: F) -> Result<V, Arc<E>>
    where
        F: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        self.cache.try_get_with(key, factory).await
    }

    /// Returns the completed value for `key`, if cached.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.cache.get(key).await
    }

    /// Drops the entry for `key`.
    pub async fn invalidate(&self, key: &K) {
        self.cache.invalidate(key).await;
    }

    /// Drops every entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of completed entries.
    ///
    /// Moka updates this lazily; call [`Self::run_pending_tasks`] first for an exact count.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
