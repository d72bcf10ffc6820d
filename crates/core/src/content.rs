//! Content service: folder resolution, uploads and retrieval over one client.

use std::sync::Arc;

use lessondrive_shared::{AppConfig, AppError, FileId, FolderId};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::folder::{FolderCacheConfig, FolderPath, FolderResolver, ResolutionError};
use crate::storage::{FileStream, RemoteStorageClient, RetryPolicy, StorageConfig, StorageError};
use crate::upload::{UploadError, UploadRequest, UploadResult, Uploader};

/// Everything a [`ContentService`] needs besides the client.
#[derive(Debug, Clone, Default)]
pub struct ContentSettings {
    /// Folder the first path segment is resolved under.
    pub root_folder_id: Option<FolderId>,
    /// Upload limits and URL derivation.
    pub storage: StorageConfig,
    /// Retry policy shared by every remote call.
    pub retry: RetryPolicy,
    /// Folder cache sizing and expiry.
    pub folder_cache: FolderCacheConfig,
}

impl From<&AppConfig> for ContentSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            root_folder_id: config
                .drive
                .root_folder_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(FolderId::new),
            storage: StorageConfig::from(&config.storage),
            retry: RetryPolicy::from(&config.retry),
            folder_cache: FolderCacheConfig::from(&config.folder_cache),
        }
    }
}

/// Errors from [`ContentService`].
#[derive(Debug, Error)]
pub enum ContentError {
    /// Folder resolution failed.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Upload failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Retrieval failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Resolution(e) => e.into(),
            ContentError::Upload(e) => e.into(),
            ContentError::Storage(e) => e.into(),
        }
    }
}

/// Facade owning one resolver and one uploader over a shared client.
pub struct ContentService<C: RemoteStorageClient + ?Sized> {
    client: Arc<C>,
    retry: RetryPolicy,
    resolver: FolderResolver<C>,
    uploader: Uploader<C>,
}

impl<C: RemoteStorageClient + ?Sized> ContentService<C> {
    /// Create a service over `client`.
    #[must_use]
    pub fn new(client: Arc<C>, settings: ContentSettings) -> Self {
        let resolver = FolderResolver::with_cache_config(
            Arc::clone(&client),
            settings.retry,
            settings.root_folder_id,
            settings.folder_cache,
        );
        let uploader = Uploader::new(Arc::clone(&client), settings.retry, settings.storage);

        Self {
            client,
            retry: settings.retry,
            resolver,
            uploader,
        }
    }

    /// The folder resolver.
    #[must_use]
    pub fn resolver(&self) -> &FolderResolver<C> {
        &self.resolver
    }

    /// The uploader.
    #[must_use]
    pub fn uploader(&self) -> &Uploader<C> {
        &self.uploader
    }

    /// Backend name, for logs.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.client.name()
    }

    /// Resolve `path` to a folder ID, creating missing folders.
    ///
    /// # Errors
    ///
    /// Returns an error if any segment cannot be resolved.
    pub async fn resolve(&self, path: &FolderPath) -> Result<FolderId, ContentError> {
        Ok(self.resolver.resolve_path(path).await?)
    }

    /// Upload into a known folder.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or file creation fails.
    pub async fn upload(
        &self,
        request: UploadRequest,
        folder_id: &FolderId,
    ) -> Result<UploadResult, ContentError> {
        Ok(self.uploader.upload(request, folder_id).await?)
    }

    /// Resolve `path`, then upload into the leaf folder.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution, validation or file creation fails.
    #[instrument(skip(self, request), fields(path = %path, file_name = %request.file_name))]
    pub async fn upload_to_path(
        &self,
        path: &FolderPath,
        request: UploadRequest,
    ) -> Result<UploadResult, ContentError> {
        self.uploader.validate(&request)?;
        let folder_id = self.resolve(path).await?;
        debug!(folder_id = %folder_id, "Resolved upload folder");
        self.upload(request, &folder_id).await
    }

    /// Open a file's content as a byte stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub async fn open_stream(&self, file_id: &FileId) -> Result<FileStream, ContentError> {
        let stream = self
            .retry
            .execute("get_file_stream", || self.client.get_file_stream(file_id))
            .await?;
        Ok(stream)
    }

    /// Forget cached folder IDs along `path`.
    pub async fn invalidate(&self, path: &FolderPath) -> usize {
        self.resolver.invalidate(path).await
    }
}
