//! Storage module for persisting indexing status
//!
//! This module handles the flat per-site status cache:
//! - One JSON file per site mapping page URL to its last known status
//! - Loading (or starting empty) at the beginning of a run
//! - Writing the whole map back once checking is complete
//! - Deciding which cached entries are stale

mod policy;
mod record;
mod status_cache;

pub use policy::{cache_horizon, should_recheck, CACHE_HORIZON_DAYS, MAX_CACHE_HORIZON_DAYS};
pub use record::StatusRecord;
pub use status_cache::StatusCache;

use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Cache file {path} is not a valid status map: {source}")]
    Serialization {
        path: String,
        source: serde_json::Error,
    },

    #[error("Cache entries must have a non-empty URL")]
    EmptyKey,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
