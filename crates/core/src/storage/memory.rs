//! In-process drive (development and tests).
//!
//! Counts every call per operation and can be told to fail, delay or misplace
//! uploads, which is what the resolver and uploader tests lean on.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use lessondrive_shared::{FileId, FolderId};
use uuid::Uuid;

use super::client::{
    FileRecord, FileStream, FolderQuery, FolderSummary, NewFile, RemoteStorageClient,
};
use super::error::StorageError;

/// Remote operation, used to count calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `list_folders`
    ListFolders,
    /// `create_folder`
    CreateFolder,
    /// `create_file`
    CreateFile,
    /// `move_file`
    MoveFile,
    /// `set_public_readable`
    SetPublicReadable,
    /// `get_file_stream`
    GetFileStream,
}

/// Folder held by [`MemoryDrive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFolder {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder, `None` for the default root.
    pub parent_id: Option<FolderId>,
    /// Whether the folder is in the trash.
    pub trashed: bool,
}

/// File held by [`MemoryDrive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// File ID.
    pub id: FileId,
    /// File name.
    pub name: String,
    /// Parent folders.
    pub parents: Vec<FolderId>,
    /// Content.
    pub bytes: Bytes,
    /// Content type.
    pub mime_type: String,
    /// Whether anyone can read it.
    pub public: bool,
}

#[derive(Default)]
struct State {
    folders: Vec<StoredFolder>,
    files: HashMap<FileId, StoredFile>,
    calls: HashMap<Operation, usize>,
    failures: HashMap<Operation, VecDeque<StorageError>>,
    misplace_into: Option<FolderId>,
}

/// In-memory [`RemoteStorageClient`].
#[derive(Default)]
pub struct MemoryDrive {
    state: Mutex<State>,
    latency: Mutex<Duration>,
}

impl MemoryDrive {
    /// Create an empty drive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Delay every call by `latency`, so concurrent callers overlap.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = latency;
    }

    /// Fail the next `times` calls of `op` with `err`.
    pub fn fail_next(&self, op: Operation, times: usize, err: &StorageError) {
        let mut state = self.state();
        let queue = state.failures.entry(op).or_default();
        queue.extend(std::iter::repeat_n(err.clone(), times));
    }

    /// Report (and store) new uploads under `folder_id` instead of the requested parent.
    pub fn misplace_uploads_into(&self, folder_id: Option<FolderId>) {
        self.state().misplace_into = folder_id;
    }

    /// Number of calls made for `op`, including failed ones.
    #[must_use]
    pub fn calls(&self, op: Operation) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    /// Insert a folder directly, bypassing call counting.
    pub fn insert_folder(&self, name: &str, parent_id: Option<FolderId>) -> FolderId {
        let id = FolderId::new(format!("folder-{}", Uuid::new_v4().simple()));
        self.state().folders.push(StoredFolder {
            id: id.clone(),
            name: name.to_string(),
            parent_id,
            trashed: false,
        });
        id
    }

    /// Move a folder to the trash.
    pub fn trash_folder(&self, id: &FolderId) {
        if let Some(folder) = self.state().folders.iter_mut().find(|f| &f.id == id) {
            folder.trashed = true;
        }
    }

    /// All live folders named `name` under `parent_id`.
    #[must_use]
    pub fn folders_named(&self, name: &str, parent_id: Option<&FolderId>) -> Vec<StoredFolder> {
        self.state()
            .folders
            .iter()
            .filter(|f| !f.trashed && f.name == name && f.parent_id.as_ref() == parent_id)
            .cloned()
            .collect()
    }

    /// Number of live folders.
    #[must_use]
    pub fn folder_count(&self) -> usize {
        self.state().folders.iter().filter(|f| !f.trashed).count()
    }

    /// Look up a stored file.
    #[must_use]
    pub fn file(&self, id: &FileId) -> Option<StoredFile> {
        self.state().files.get(id).cloned()
    }

    /// Records the call and pops an injected failure, then waits out the latency.
    async fn enter(&self, op: Operation) -> Result<(), StorageError> {
        let injected = {
            let mut state = self.state();
            *state.calls.entry(op).or_default() += 1;
            state.failures.get_mut(&op).and_then(VecDeque::pop_front)
        };

        let latency = *self.latency.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        injected.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl RemoteStorageClient for MemoryDrive {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_folders(&self, query: &FolderQuery) -> Result<Vec<FolderSummary>, StorageError> {
        self.enter(Operation::ListFolders).await?;

        Ok(self
            .state()
            .folders
            .iter()
            .filter(|f| {
                f.name == query.name
                    && f.parent_id == query.parent_id
                    && (query.include_trashed || !f.trashed)
            })
            .map(|f| FolderSummary {
                id: f.id.clone(),
                name: f.name.clone(),
            })
            .collect())
    }

    async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<FolderSummary, StorageError> {
        self.enter(Operation::CreateFolder).await?;

        if name.trim().is_empty() {
            return Err(StorageError::invalid_request("folder name is empty"));
        }

        let id = self.insert_folder(name, parent_id);
        Ok(FolderSummary {
            id,
            name: name.to_string(),
        })
    }

    async fn create_file(&self, file: NewFile) -> Result<FileRecord, StorageError> {
        self.enter(Operation::CreateFile).await?;

        let mut state = self.state();
        let parent = state
            .misplace_into
            .clone()
            .unwrap_or_else(|| file.parent_id.clone());
        let id = FileId::new(format!("file-{}", Uuid::new_v4().simple()));

        state.files.insert(
            id.clone(),
            StoredFile {
                id: id.clone(),
                name: file.name,
                parents: vec![parent.clone()],
                bytes: file.bytes,
                mime_type: file.mime_type,
                public: false,
            },
        );

        Ok(FileRecord {
            web_view_link: Some(format!("memory://files/{id}")),
            id,
            parents: vec![parent],
        })
    }

    async fn move_file(
        &self,
        file_id: &FileId,
        add_parent: &FolderId,
        remove_parents: &[FolderId],
    ) -> Result<FileRecord, StorageError> {
        self.enter(Operation::MoveFile).await?;

        let mut state = self.state();
        let file = state
            .files
            .get_mut(file_id)
            .ok_or_else(|| StorageError::not_found(format!("file {file_id}")))?;

        file.parents.retain(|p| !remove_parents.contains(p));
        if !file.parents.contains(add_parent) {
            file.parents.push(add_parent.clone());
        }

        Ok(FileRecord {
            id: file.id.clone(),
            parents: file.parents.clone(),
            web_view_link: Some(format!("memory://files/{file_id}")),
        })
    }

    async fn set_public_readable(&self, file_id: &FileId) -> Result<(), StorageError> {
        self.enter(Operation::SetPublicReadable).await?;

        self.state()
            .files
            .get_mut(file_id)
            .map(|file| file.public = true)
            .ok_or_else(|| StorageError::not_found(format!("file {file_id}")))
    }

    async fn get_file_stream(&self, file_id: &FileId) -> Result<FileStream, StorageError> {
        self.enter(Operation::GetFileStream).await?;

        let StoredFile {
            bytes, mime_type, ..
        } = self
            .file(file_id)
            .ok_or_else(|| StorageError::not_found(format!("file {file_id}")))?;

        Ok(FileStream {
            content_length: Some(bytes.len() as u64),
            content_type: mime_type,
            stream: futures::stream::once(async move { Ok(bytes) }).boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_list_folder() {
        let drive = MemoryDrive::new();
        let root = FolderId::new("root");

        let created = drive
            .create_folder("Stage A", Some(root.clone()))
            .await
            .expect("creates");
        let listed = drive
            .list_folders(&FolderQuery::new("Stage A", Some(root)))
            .await
            .expect("lists");

        assert_eq!(listed, vec![created]);
        assert_eq!(drive.calls(Operation::CreateFolder), 1);
        assert_eq!(drive.calls(Operation::ListFolders), 1);
    }

    #[tokio::test]
    async fn test_list_skips_trashed_and_other_parents() {
        let drive = MemoryDrive::new();
        let trashed = drive.insert_folder("Math", None);
        drive.trash_folder(&trashed);
        drive.insert_folder("Math", Some(FolderId::new("elsewhere")));

        let listed = drive
            .list_folders(&FolderQuery::new("Math", None))
            .await
            .expect("lists");
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed_in_order() {
        let drive = MemoryDrive::new();
        drive.fail_next(Operation::ListFolders, 2, &StorageError::timeout("slow"));

        let query = FolderQuery::new("x", None);
        assert!(drive.list_folders(&query).await.is_err());
        assert!(drive.list_folders(&query).await.is_err());
        assert!(drive.list_folders(&query).await.is_ok());
        assert_eq!(drive.calls(Operation::ListFolders), 3);
    }

    #[tokio::test]
    async fn test_misplaced_upload_and_move() {
        let drive = MemoryDrive::new();
        let wrong = FolderId::new("wrong");
        let target = FolderId::new("target");
        drive.misplace_uploads_into(Some(wrong.clone()));

        let record = drive
            .create_file(NewFile {
                name: "a.png".into(),
                parent_id: target.clone(),
                bytes: Bytes::from_static(b"png"),
                mime_type: "image/png".into(),
            })
            .await
            .expect("creates");
        assert_eq!(record.parents, vec![wrong.clone()]);

        let moved = drive
            .move_file(&record.id, &target, &[wrong])
            .await
            .expect("moves");
        assert_eq!(moved.parents, vec![target]);
    }

    #[tokio::test]
    async fn test_stream_missing_file() {
        let drive = MemoryDrive::new();
        let err = drive
            .get_file_stream(&FileId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
