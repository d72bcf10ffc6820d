//! Core logic for Lessondrive.
//!
//! This crate contains folder resolution and upload logic with ZERO HTTP
//! dependencies. Remote backends plug in through
//! [`storage::RemoteStorageClient`].
//!
//! # Modules
//!
//! - `storage` - Client trait, retry policy, in-memory backend
//! - `folder` - Path-to-folder resolution with a single-flight cache
//! - `upload` - Upload, placement repair, public URL derivation
//! - `content` - Facade tying the above together

pub mod content;
pub mod folder;
pub mod storage;
pub mod upload;

pub use content::{ContentError, ContentService, ContentSettings};
pub use folder::{FolderPath, FolderResolver, ResolutionError};
pub use storage::{RemoteStorageClient, RetryPolicy, StorageError};
pub use upload::{UploadError, UploadRequest, UploadResult, Uploader};
