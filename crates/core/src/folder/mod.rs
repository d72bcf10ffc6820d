//! Folder hierarchy resolution.
//!
//! Turns an ordered path like `Stage A / Subject B / Teacher C / Lesson D`
//! into the ID of the leaf folder on the remote drive:
//! - Each segment is looked up under the previously resolved parent
//! - Missing folders are created
//! - Concurrent requests for the same folder share one lookup (single-flight)
//! - Resolved IDs are cached for the life of the resolver

mod cache;
mod error;
mod path;
mod resolver;


pub use cache::{FolderCache, FolderCacheConfig, SingleFlight};
pub use error::ResolutionError;
pub use path::{FolderKey, FolderPath};
pub use resolver::FolderResolver;
