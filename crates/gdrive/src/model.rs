//! Drive API wire types.

use lessondrive_core::storage::{FileRecord, FolderSummary};
use lessondrive_shared::{FileId, FolderId};
use serde::{Deserialize, Serialize};

/// Response of `files.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// File resource, restricted to the fields we request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
    pub web_view_link: Option<String>,
}

impl From<DriveFile> for FolderSummary {
    fn from(file: DriveFile) -> Self {
        Self {
            id: FolderId::new(file.id),
            name: file.name,
        }
    }
}

impl From<DriveFile> for FileRecord {
    fn from(file: DriveFile) -> Self {
        Self {
            id: FileId::new(file.id),
            parents: file.parents.into_iter().map(FolderId::new).collect(),
            web_view_link: file.web_view_link,
        }
    }
}

/// Metadata sent when creating a file or folder.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewFileMetadata<'a> {
    pub name: &'a str,
    pub mime_type: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<&'a str>,
}

/// Body of `permissions.create`.
#[derive(Debug, Serialize)]
pub(crate) struct Permission<'a> {
    pub role: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
}
