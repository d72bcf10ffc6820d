//! Google Drive v3 backend for Lessondrive.
//!
//! [`DriveClient`] implements [`RemoteStorageClient`] on top of the Drive
//! REST API with a caller-supplied OAuth2 access token. Token issuance and
//! refresh happen outside this crate.
//!
//! [`RemoteStorageClient`]: lessondrive_core::storage::RemoteStorageClient

mod client;
mod config;
mod error;
mod model;
mod multipart;
mod query;

pub use client::DriveClient;
pub use config::DriveClientConfig;
pub use query::{ROOT_ALIAS, escape_query_value, folder_query};
