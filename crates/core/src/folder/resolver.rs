//! Folder resolver implementation.

use std::sync::Arc;

use lessondrive_shared::FolderId;
use tracing::{debug, info};

use super::cache::{FolderCache, FolderCacheConfig};
use super::error::ResolutionError;
use super::path::{FolderKey, FolderPath};
use crate::storage::{FolderQuery, RemoteStorageClient, RetryPolicy, StorageError};

/// Resolves folder paths to folder IDs, creating missing folders.
///
/// Each resolver owns its cache, so two resolvers never share state.
pub struct FolderResolver<C: RemoteStorageClient + ?Sized> {
    client: Arc<C>,
    retry: RetryPolicy,
    root_id: Option<FolderId>,
    cache: FolderCache,
}

impl<C: RemoteStorageClient + ?Sized> FolderResolver<C> {
    /// Create a resolver rooted at `root_id` (`None` for the backend's default root).
    #[must_use]
    pub fn new(client: Arc<C>, retry: RetryPolicy, root_id: Option<FolderId>) -> Self {
        Self::with_cache_config(client, retry, root_id, FolderCacheConfig::default())
    }

    /// Create a resolver with custom cache sizing and expiry.
    #[must_use]
    pub fn with_cache_config(
        client: Arc<C>,
        retry: RetryPolicy,
        root_id: Option<FolderId>,
        cache_config: FolderCacheConfig,
    ) -> Self {
        Self {
            client,
            retry,
            root_id,
            cache: FolderCache::with_config(cache_config),
        }
    }

    /// The folder the first segment is resolved under.
    #[must_use]
    pub fn root_id(&self) -> Option<&FolderId> {
        self.root_id.as_ref()
    }

    /// The resolution cache.
    #[must_use]
    pub fn cache(&self) -> &FolderCache {
        &self.cache
    }

    /// Resolve `segments` to the ID of the leaf folder, creating folders as needed.
    ///
    /// Segments are trimmed and blank ones skipped. They are resolved strictly
    /// in order. Concurrent resolutions of the same `(parent, name)` share one
    /// lookup; once resolved, the ID is reused without touching the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Segment`] for the first segment that fails,
    /// or [`ResolutionError::EmptyPath`] if nothing is left to resolve and no
    /// root folder is configured.
    pub async fn resolve<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<FolderId, ResolutionError> {
        let mut parent = self.root_id.clone();

        for (position, raw) in segments.iter().enumerate() {
            let segment = raw.as_ref().trim();
            if segment.is_empty() {
                continue;
            }

            let key = FolderKey::new(parent.clone(), segment);
            let id = self
                .cache
                .get_or_create(key.clone(), self.find_or_create(key))
                .await
                .map_err(|source| ResolutionError::segment(segment, position, source))?;

            parent = Some(id);
        }

        parent.ok_or(ResolutionError::EmptyPath)
    }

    /// Resolve a typed path.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn resolve_path(&self, path: &FolderPath) -> Result<FolderId, ResolutionError> {
        self.resolve(path.segments()).await
    }

    /// Forget cached IDs along `path`, for folders removed behind our back.
    ///
    /// Walks the path through the cache only; stops at the first segment that
    /// is not cached. Returns how many entries were dropped.
    pub async fn invalidate(&self, path: &FolderPath) -> usize {
        let mut parent = self.root_id.clone();
        let mut dropped = 0;

        for segment in path.segments() {
            let key = FolderKey::new(parent.clone(), segment.as_str());
            let Some(id) = self.cache.get(&key).await else {
                break;
            };
            self.cache.invalidate(&key).await;
            dropped += 1;
            parent = Some(id);
        }

        debug!(path = %path, dropped, "Invalidated cached folders");
        dropped
    }

    /// Lists `key.name` under `key.parent_id`; creates it if absent.
    async fn find_or_create(&self, key: FolderKey) -> Result<FolderId, StorageError> {
        let query = FolderQuery::new(key.name.clone(), key.parent_id.clone());
        let existing = self
            .retry
            .execute("list_folders", || self.client.list_folders(&query))
            .await?;

        // Duplicates created out-of-band: take the first in backend order.
        if let Some(found) = existing.into_iter().next() {
            debug!(folder_id = %found.id, name = %key.name, "Found existing folder");
            return Ok(found.id);
        }

        let created = self
            .retry
            .execute("create_folder", || {
                self.client.create_folder(&key.name, key.parent_id.clone())
            })
            .await?;

        info!(
            folder_id = %created.id,
            name = %key.name,
            parent_id = ?key.parent_id.as_ref().map(FolderId::as_str),
            "Created folder"
        );
        Ok(created.id)
    }
}
