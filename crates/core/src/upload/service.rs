//! Uploader implementation.

use std::sync::Arc;

use lessondrive_shared::FolderId;
use tracing::{info, warn};

use super::error::UploadError;
use super::types::{Placement, UploadRequest, UploadResult};
use super::url::public_url;
use crate::storage::{FileRecord, NewFile, RemoteStorageClient, RetryPolicy, StorageConfig};

/// Uploads files into resolved folders and makes them publicly readable.
pub struct Uploader<C: RemoteStorageClient + ?Sized> {
    client: Arc<C>,
    retry: RetryPolicy,
    config: StorageConfig,
}

impl<C: RemoteStorageClient + ?Sized> Uploader<C> {
    /// Create a new uploader.
    #[must_use]
    pub fn new(client: Arc<C>, retry: RetryPolicy, config: StorageConfig) -> Self {
        Self {
            client,
            retry,
            config,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Validate an upload request against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the file name is empty, or the size or MIME type is
    /// not allowed.
    pub fn validate(&self, request: &UploadRequest) -> Result<(), UploadError> {
        if request.file_name.trim().is_empty() {
            return Err(UploadError::EmptyFileName);
        }

        if request.size() > self.config.max_file_size {
            return Err(UploadError::file_too_large(
                request.size(),
                self.config.max_file_size,
            ));
        }

        // The MIME type ends up in a multipart header line.
        if request.mime_type.chars().any(char::is_control)
            || !self.config.is_mime_type_allowed(&request.mime_type)
        {
            return Err(UploadError::MimeTypeNotAllowed(request.mime_type.clone()));
        }

        Ok(())
    }

    /// Upload `request` into `folder_id`.
    ///
    /// After creation the reported parents are checked; if the backend put the
    /// file elsewhere, one corrective move is attempted. The file is then made
    /// publicly readable. Neither step can fail the upload once the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the file cannot be created.
    pub async fn upload(
        &self,
        request: UploadRequest,
        folder_id: &FolderId,
    ) -> Result<UploadResult, UploadError> {
        self.validate(&request)?;

        let created = self
            .retry
            .execute("create_file", || {
                self.client.create_file(NewFile {
                    name: request.file_name.clone(),
                    parent_id: folder_id.clone(),
                    bytes: request.bytes.clone(),
                    mime_type: request.mime_type.clone(),
                })
            })
            .await
            .map_err(|source| UploadError::create(&request.file_name, source))?;

        info!(
            file_id = %created.id,
            folder_id = %folder_id,
            size = request.size(),
            "Created file"
        );

        let (record, placement) = self.verify_placement(created, folder_id).await;
        let is_public = self.grant_public_read(&record).await;

        Ok(UploadResult {
            public_url: public_url(&self.config, &request.mime_type, &record.id),
            file_id: record.id,
            raw_backend_link: record.web_view_link,
            parents: record.parents,
            placement,
            is_public,
        })
    }

    /// Moves the file into `folder_id` if the backend reported other parents.
    async fn verify_placement(
        &self,
        created: FileRecord,
        folder_id: &FolderId,
    ) -> (FileRecord, Placement) {
        if created.parents.contains(folder_id) {
            return (created, Placement::AsRequested);
        }

        warn!(
            file_id = %created.id,
            expected = %folder_id,
            actual = ?created.parents,
            "File created under unexpected parents, moving"
        );

        let moved = self
            .retry
            .execute("move_file", || {
                self.client
                    .move_file(&created.id, folder_id, &created.parents)
            })
            .await;

        match moved {
            Ok(record) => (
                FileRecord {
                    web_view_link: record.web_view_link.or(created.web_view_link),
                    ..record
                },
                Placement::Repaired,
            ),
            Err(err) => {
                warn!(
                    file_id = %created.id,
                    error = %err,
                    "Failed to move file into requested folder"
                );
                (created, Placement::Misplaced)
            }
        }
    }

    /// Grants public read access. Returns whether it succeeded.
    async fn grant_public_read(&self, record: &FileRecord) -> bool {
        match self
            .retry
            .execute("set_public_readable", || {
                self.client.set_public_readable(&record.id)
            })
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    file_id = %record.id,
                    error = %err,
                    "Failed to make file public"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bytes::Bytes;
    use lessondrive_shared::FileId;
    use mockall::predicate::eq;

    use crate::storage::{MockRemoteStorageClient, StorageError};

    fn record(id: &str, parents: &[&str]) -> FileRecord {
        FileRecord {
            id: FileId::new(id),
            parents: parents.iter().map(|p| FolderId::new(*p)).collect(),
            web_view_link: Some(format!("https://drive.google.com/file/d/{id}/view")),
        }
    }

    fn uploader(mock: MockRemoteStorageClient) -> Uploader<MockRemoteStorageClient> {
        Uploader::new(
            Arc::new(mock),
            RetryPolicy::new(3, Duration::from_millis(1)),
            StorageConfig::new(),
        )
    }

    fn png() -> UploadRequest {
        UploadRequest::new(Bytes::from_static(b"\x89PNG"), "diagram.png", "image/png")
    }

    #[tokio::test]
    async fn test_image_upload_in_place() {
        let mut mock = MockRemoteStorageClient::new();
        mock.expect_create_file()
            .withf(|f| {
                f.name == "diagram.png" && f.parent_id == "lesson" && f.mime_type == "image/png"
            })
            .times(1)
            .returning(|_| Ok(record("f1", &["lesson"])));
        mock.expect_move_file().never();
        mock.expect_set_public_readable()
            .with(eq(FileId::new("f1")))
            .times(1)
            .returning(|_| Ok(()));

        let result = uploader(mock)
            .upload(png(), &FolderId::new("lesson"))
            .await
            .expect("uploads");

        assert_eq!(result.file_id, "f1");
        assert_eq!(result.public_url, "/api/drive/image?fileId=f1");
        assert_eq!(
            result.raw_backend_link.as_deref(),
            Some("https://drive.google.com/file/d/f1/view")
        );
        assert_eq!(result.placement, Placement::AsRequested);
        assert!(result.is_public);
    }

    #[tokio::test]
    async fn test_pdf_gets_direct_view_url() {
        let mut mock = MockRemoteStorageClient::new();
        mock.expect_create_file()
            .returning(|_| Ok(record("f2", &["lesson"])));
        mock.expect_set_public_readable().returning(|_| Ok(()));

        let result = uploader(mock)
            .upload(
                UploadRequest::new(Bytes::from_static(b"%PDF"), "notes.pdf", "application/pdf"),
                &FolderId::new("lesson"),
            )
            .await
            .expect("uploads");

        assert_eq!(
            result.public_url,
            "https://drive.google.com/uc?export=view&id=f2"
        );
    }

    #[tokio::test]
    async fn test_misplaced_file_is_moved_once() {
        let mut mock = MockRemoteStorageClient::new();
        mock.expect_create_file()
            .times(1)
            .returning(|_| Ok(record("f3", &["root"])));
        mock.expect_move_file()
            .withf(|id, add, remove| {
                id == &FileId::new("f3")
                    && add == &FolderId::new("lesson")
                    && remove == [FolderId::new("root")]
            })
            .times(1)
            .returning(|_, _, _| Ok(record("f3", &["lesson"])));
        mock.expect_set_public_readable().times(1).returning(|_| Ok(()));

        let result = uploader(mock)
            .upload(png(), &FolderId::new("lesson"))
            .await
            .expect("uploads");

        assert_eq!(result.placement, Placement::Repaired);
        assert_eq!(result.parents, vec![FolderId::new("lesson")]);
    }

    #[tokio::test]
    async fn test_failed_move_still_succeeds() {
        let mut mock = MockRemoteStorageClient::new();
        mock.expect_create_file()
            .returning(|_| Ok(record("f4", &["root"])));
        mock.expect_move_file()
            .times(1)
            .returning(|_, _, _| Err(StorageError::unauthorized("no edit rights")));
        mock.expect_set_public_readable().returning(|_| Ok(()));

        let result = uploader(mock)
            .upload(png(), &FolderId::new("lesson"))
            .await
            .expect("upload still succeeds");

        assert_eq!(result.file_id, "f4");
        assert_eq!(result.placement, Placement::Misplaced);
        assert_eq!(result.parents, vec![FolderId::new("root")]);
    }

    #[tokio::test]
    async fn test_permission_failure_is_tolerated() {
        let mut mock = MockRemoteStorageClient::new();
        mock.expect_create_file()
            .returning(|_| Ok(record("f5", &["lesson"])));
        mock.expect_set_public_readable()
            .times(1)
            .returning(|_| Err(StorageError::invalid_request("sharing disabled")));

        let result = uploader(mock)
            .upload(png(), &FolderId::new("lesson"))
            .await
            .expect("upload still succeeds");

        assert_eq!(result.file_id, "f5");
        assert!(!result.is_public);
        assert_eq!(result.public_url, "/api/drive/image?fileId=f5");
    }

    #[tokio::test]
    async fn test_create_failure_fails_upload_without_follow_ups() {
        let mut mock = MockRemoteStorageClient::new();
        mock.expect_create_file()
            .times(1)
            .returning(|_| Err(StorageError::QuotaExceeded("storage full".into())));
        mock.expect_move_file().never();
        mock.expect_set_public_readable().never();

        let err = uploader(mock)
            .upload(png(), &FolderId::new("lesson"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Create {
                source: StorageError::QuotaExceeded(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_retries_with_fresh_body() {
        let mut mock = MockRemoteStorageClient::new();
        let mut calls = 0;
        mock.expect_create_file()
            .times(2)
            .returning(move |file| {
                calls += 1;
                assert_eq!(&file.bytes[..], b"\x89PNG");
                if calls == 1 {
                    Err(StorageError::connection("reset"))
                } else {
                    Ok(record("f6", &["lesson"]))
                }
            });
        mock.expect_set_public_readable().returning(|_| Ok(()));

        let result = uploader(mock)
            .upload(png(), &FolderId::new("lesson"))
            .await
            .expect("uploads after retry");

        assert_eq!(result.file_id, "f6");
    }

    #[tokio::test]
    async fn test_validation_rejects_before_remote_calls() {
        let config = StorageConfig::new()
            .with_max_file_size(2)
            .with_allowed_mime_types(vec!["image/png".into()]);

        let mut mock = MockRemoteStorageClient::new();
        mock.expect_create_file().never();
        let uploader = Uploader::new(Arc::new(mock), RetryPolicy::no_retry(), config);
        let folder = FolderId::new("lesson");

        let err = uploader.upload(png(), &folder).await.unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { size: 4, max: 2 }));

        let err = uploader
            .upload(
                UploadRequest::new(Bytes::from_static(b"x"), "a.txt", "text/plain"),
                &folder,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::MimeTypeNotAllowed(_)));

        let err = uploader
            .upload(
                UploadRequest::new(Bytes::from_static(b"x"), "  ", "image/png"),
                &folder,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::EmptyFileName));
    }

    #[tokio::test]
    async fn test_mime_type_with_line_break_is_rejected() {
        let mut mock = MockRemoteStorageClient::new();
        mock.expect_create_file().never();
        mock.expect_set_public_readable().never();
        let uploader = uploader(mock);
        let folder = FolderId::new("lesson");

        for mime in ["image/png\r\nX-Injected: 1", "text/plain\n--boundary", "image/png\0"] {
            let err = uploader
                .upload(UploadRequest::new(Bytes::from_static(b"x"), "a.png", mime), &folder)
                .await
                .unwrap_err();
            assert!(matches!(err, UploadError::MimeTypeNotAllowed(ref m) if m == mime));
        }
    }
}
