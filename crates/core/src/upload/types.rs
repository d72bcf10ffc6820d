//! Upload request and result types.

use bytes::Bytes;
use lessondrive_shared::{FileId, FolderId};
use serde::{Deserialize, Serialize};

/// A file to upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File content.
    pub bytes: Bytes,
    /// File name as it should appear on the drive.
    pub file_name: String,
    /// Content type.
    pub mime_type: String,
}

impl UploadRequest {
    /// Create an upload request.
    #[must_use]
    pub fn new(
        bytes: impl Into<Bytes>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Content size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Where the uploaded file ended up relative to the requested folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Backend placed it in the requested folder.
    AsRequested,
    /// Backend misplaced it and the corrective move succeeded.
    Repaired,
    /// Backend misplaced it and the corrective move failed.
    Misplaced,
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Backend file ID.
    pub file_id: FileId,
    /// URL clients should use to fetch the file.
    pub public_url: String,
    /// Backend's own link, if it reported one.
    pub raw_backend_link: Option<String>,
    /// Final parents as last reported by the backend.
    pub parents: Vec<FolderId>,
    /// Placement outcome.
    pub placement: Placement,
    /// Whether the public-read grant succeeded.
    pub is_public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_request_size() {
        let req = UploadRequest::new(vec![0u8; 42], "a.pdf", "application/pdf");
        assert_eq!(req.size(), 42);
    }

    #[test]
    fn test_upload_result_json_shape() {
        let result = UploadResult {
            file_id: FileId::new("f1"),
            public_url: "/api/drive/image?fileId=f1".into(),
            raw_backend_link: None,
            parents: vec![FolderId::new("p1")],
            placement: Placement::Repaired,
            is_public: true,
        };

        let json = serde_json::to_value(&result).expect("serializes");
        assert_eq!(json["fileId"], "f1");
        assert_eq!(json["publicUrl"], "/api/drive/image?fileId=f1");
        assert_eq!(json["rawBackendLink"], serde_json::Value::Null);
        assert_eq!(json["placement"], "repaired");
    }
}
