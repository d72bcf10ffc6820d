//! Shared types, errors, and configuration for Lessondrive.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for remote drive objects
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DriveProvider};
pub use error::{AppError, AppResult};
pub use types::{FileId, FolderId};
