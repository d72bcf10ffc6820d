//! Public URL derivation.

use lessondrive_shared::FileId;

use crate::storage::StorageConfig;

/// How a file is served to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// `image/*`: served through our proxy so the backend link stays private.
    Image,
    /// `application/pdf`: direct backend view link.
    Pdf,
    /// Anything else: direct backend view link.
    Other,
}

impl ContentKind {
    /// Classify a MIME type.
    #[must_use]
    pub fn from_mime(mime_type: &str) -> Self {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") {
            Self::Image
        } else if essence == "application/pdf" {
            Self::Pdf
        } else {
            Self::Other
        }
    }
}

/// Proxy URL: `<proxy_path>?fileId=<id>`.
#[must_use]
pub fn proxy_url(config: &StorageConfig, file_id: &FileId) -> String {
    format!(
        "{}?fileId={}",
        config.proxy_path,
        urlencoding::encode(file_id.as_str())
    )
}

/// Direct view URL: `<backend_host>/uc?export=view&id=<id>`.
#[must_use]
pub fn direct_view_url(config: &StorageConfig, file_id: &FileId) -> String {
    format!(
        "{}/uc?export=view&id={}",
        config.backend_host.trim_end_matches('/'),
        urlencoding::encode(file_id.as_str())
    )
}

/// Client-facing URL for a file of `mime_type`.
#[must_use]
pub fn public_url(config: &StorageConfig, mime_type: &str, file_id: &FileId) -> String {
    match ContentKind::from_mime(mime_type) {
        ContentKind::Image => proxy_url(config, file_id),
        ContentKind::Pdf | ContentKind::Other => direct_view_url(config, file_id),
    }
}
