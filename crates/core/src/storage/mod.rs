//! Remote storage access for uploaded lesson content.
//!
//! The core never talks to a concrete backend. Everything goes through the
//! [`RemoteStorageClient`] trait, and every call is wrapped in a
//! [`RetryPolicy`] so connection resets and timeouts are retried with
//! exponential backoff.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    RemoteStorageClient                           │
//! │            (Google Drive adapter, MemoryDrive, mocks)            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ list_folders(query)          │ create_file(name, parent, bytes) │
//! │ create_folder(name, parent)  │ move_file(id, add, remove)       │
//! │ set_public_readable(id)      │ get_file_stream(id)              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod config;
mod error;
pub mod memory;
mod retry;

#[cfg(test)]
pub use client::MockRemoteStorageClient;
pub use client::{
    FOLDER_MIME_TYPE, FileRecord, FileStream, FolderQuery, FolderSummary, NewFile,
    RemoteStorageClient,
};
pub use config::StorageConfig;
pub use error::StorageError;
pub use memory::MemoryDrive;
pub use retry::RetryPolicy;
