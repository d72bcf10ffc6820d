//! Remote storage client abstraction.

use std::fmt;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use futures::stream::BoxStream;
use lessondrive_shared::{FileId, FolderId};

use super::error::StorageError;

/// MIME type the backend uses to mark folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Folder lookup by exact name under a parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderQuery {
    /// Exact folder name.
    pub name: String,
    /// Parent folder. `None` is the backend's default root.
    pub parent_id: Option<FolderId>,
    /// Include trashed folders.
    pub include_trashed: bool,
}

impl FolderQuery {
    /// Query for live (non-trashed) folders named `name` under `parent_id`.
    #[must_use]
    pub fn new(name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        Self {
            name: name.into(),
            parent_id,
            include_trashed: false,
        }
    }
}

/// Folder returned by a listing or creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
}

/// File to create on the backend.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// File name.
    pub name: String,
    /// Folder the file should be placed in.
    pub parent_id: FolderId,
    /// File content.
    pub bytes: Bytes,
    /// Content type.
    pub mime_type: String,
}

/// File as reported by the backend after a create or move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// File ID.
    pub id: FileId,
    /// Folders the backend reports the file under.
    pub parents: Vec<FolderId>,
    /// Backend's own link to the file, if it reported one.
    pub web_view_link: Option<String>,
}

/// Streaming download of a file's content.
pub struct FileStream {
    /// Content chunks.
    pub stream: BoxStream<'static, Result<Bytes, StorageError>>,
    /// Content type reported by the backend.
    pub content_type: String,
    /// Content length, when known.
    pub content_length: Option<u64>,
}

impl FileStream {
    /// Reads the whole stream into memory.
    pub async fn collect_bytes(self) -> Result<Bytes, StorageError> {
        let mut stream = self.stream;
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

impl fmt::Debug for FileStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStream")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Narrow interface to a remote object-storage backend with folders.
///
/// Implementations report failures as [`StorageError`] and must classify
/// network blips as `Timeout`/`Connection` so callers can retry them.
/// Every method may be invoked again after a transient failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStorageClient: Send + Sync {
    /// Human-readable name of this backend (e.g., "Google Drive").
    fn name(&self) -> &'static str;

    /// List folders matching `query`, in backend order.
    async fn list_folders(&self, query: &FolderQuery) -> Result<Vec<FolderSummary>, StorageError>;

    /// Create a folder named `name` under `parent_id`.
    async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<FolderSummary, StorageError>;

    /// Upload a new file.
    async fn create_file(&self, file: NewFile) -> Result<FileRecord, StorageError>;

    /// Add `add_parent` to a file and remove it from `remove_parents`.
    async fn move_file(
        &self,
        file_id: &FileId,
        add_parent: &FolderId,
        remove_parents: &[FolderId],
    ) -> Result<FileRecord, StorageError>;

    /// Grant anyone-with-the-link read access.
    async fn set_public_readable(&self, file_id: &FileId) -> Result<(), StorageError>;

    /// Open a download stream for a file's content.
    async fn get_file_stream(&self, file_id: &FileId) -> Result<FileStream, StorageError>;
}
