//! Drive v3 REST client.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use lessondrive_core::storage::{
    FOLDER_MIME_TYPE, FileRecord, FileStream, FolderQuery, FolderSummary, NewFile,
    RemoteStorageClient, StorageError,
};
use lessondrive_shared::{FileId, FolderId};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::DriveClientConfig;
use crate::error::{from_reqwest, from_status};
use crate::model::{DriveFile, FileList, NewFileMetadata, Permission};
use crate::multipart::RelatedBody;
use crate::query::folder_query;

const FILE_FIELDS: &str = "id,parents,webViewLink";
const FOLDER_FIELDS: &str = "id,name";
const LIST_FIELDS: &str = "files(id,name,parents)";

/// Google Drive implementation of [`RemoteStorageClient`].
pub struct DriveClient {
    http: Client,
    config: DriveClientConfig,
}

impl DriveClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: DriveClientConfig) -> Result<Self, StorageError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                StorageError::invalid_request(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &DriveClientConfig {
        &self.config
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.config.api_base)
    }

    fn file_url(&self, file_id: &FileId) -> String {
        format!(
            "{}/files/{}",
            self.config.api_base,
            urlencoding::encode(file_id.as_str())
        )
    }

    /// Send with auth and turn non-2xx responses into errors.
    async fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, StorageError> {
        let response = request
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| from_reqwest(&e))?;

        let status = response.status();
        if status.is_success() {
            debug!(operation, status = status.as_u16(), "Drive request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = from_status(status, &body);
        warn!(operation, status = status.as_u16(), error = %err, "Drive request failed");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, StorageError> {
        self.send(operation, request)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Decode(format!("{operation}: {e}")))
    }
}

#[async_trait]
impl RemoteStorageClient for DriveClient {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn list_folders(
        &self,
        query: &FolderQuery,
    ) -> Result<Vec<FolderSummary>, StorageError> {
        let q = folder_query(query);
        let request = self.http.get(self.files_url()).query(&[
            ("q", q.as_str()),
            ("fields", LIST_FIELDS),
            ("spaces", "drive"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);

        let list: FileList = self.send_json("list_folders", request).await?;
        Ok(list.files.into_iter().map(FolderSummary::from).collect())
    }

    async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<FolderSummary, StorageError> {
        let metadata = NewFileMetadata {
            name,
            mime_type: FOLDER_MIME_TYPE,
            parents: parent_id.iter().map(FolderId::as_str).collect(),
        };
        let request = self
            .http
            .post(self.files_url())
            .query(&[("fields", FOLDER_FIELDS), ("supportsAllDrives", "true")])
            .json(&metadata);

        let file: DriveFile = self.send_json("create_folder", request).await?;
        Ok(file.into())
    }

    async fn create_file(&self, file: NewFile) -> Result<FileRecord, StorageError> {
        let metadata = serde_json::to_vec(&NewFileMetadata {
            name: &file.name,
            mime_type: &file.mime_type,
            parents: vec![file.parent_id.as_str()],
        })
        .map_err(|e| StorageError::invalid_request(format!("failed to encode metadata: {e}")))?;
        let body = RelatedBody::new(&metadata, &file.mime_type, &file.bytes);

        let request = self
            .http
            .post(format!("{}/files", self.config.upload_base))
            .query(&[
                ("uploadType", "multipart"),
                ("fields", FILE_FIELDS),
                ("supportsAllDrives", "true"),
            ])
            .header(CONTENT_TYPE, body.content_type())
            .body(body.into_body());

        let created: DriveFile = self.send_json("create_file", request).await?;
        Ok(created.into())
    }

    async fn move_file(
        &self,
        file_id: &FileId,
        add_parent: &FolderId,
        remove_parents: &[FolderId],
    ) -> Result<FileRecord, StorageError> {
        let remove = remove_parents
            .iter()
            .map(FolderId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut request = self.http.patch(self.file_url(file_id)).query(&[
            ("addParents", add_parent.as_str()),
            ("fields", FILE_FIELDS),
            ("supportsAllDrives", "true"),
        ]);
        if !remove.is_empty() {
            request = request.query(&[("removeParents", remove.as_str())]);
        }

        let moved: DriveFile = self
            .send_json("move_file", request.json(&serde_json::json!({})))
            .await?;
        Ok(moved.into())
    }

    async fn set_public_readable(&self, file_id: &FileId) -> Result<(), StorageError> {
        let request = self
            .http
            .post(format!("{}/permissions", self.file_url(file_id)))
            .query(&[("supportsAllDrives", "true")])
            .json(&Permission {
                role: "reader",
                kind: "anyone",
            });

        self.send("set_public_readable", request).await?;
        Ok(())
    }

    async fn get_file_stream(&self, file_id: &FileId) -> Result<FileStream, StorageError> {
        let request = self
            .http
            .get(self.file_url(file_id))
            .query(&[("alt", "media"), ("supportsAllDrives", "true")]);

        let response = self.send("get_file_stream", request).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let content_length = response.content_length();

        Ok(FileStream {
            stream: response.bytes_stream().map_err(|e| from_reqwest(&e)).boxed(),
            content_type,
            content_length,
        })
    }
}
