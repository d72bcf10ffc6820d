//! File upload into resolved folders.
//!
//! An upload runs in four steps against the [`RemoteStorageClient`]:
//!
//! ```text
//! validate ──► create_file ──► verify parents ──► set_public_readable ──► URL
//!                  │                 │                     │
//!               (fatal)      (one move_file,         (best-effort)
//!                              best-effort)
//! ```
//!
//! Only validation and creation can fail an upload. Images are served
//! through the proxy path, everything else through the backend view link.
//!
//! [`RemoteStorageClient`]: crate::storage::RemoteStorageClient

mod error;
mod service;
mod types;
mod url;

pub use error::UploadError;
pub use service::Uploader;
pub use types::{Placement, UploadRequest, UploadResult};
pub use url::{ContentKind, direct_view_url, proxy_url, public_url};
