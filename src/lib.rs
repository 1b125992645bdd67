//! Search-Indexer: a sitemap-driven index auditor
//!
//! This crate audits the pages of a Search Console property against Google's
//! index, caches the coverage state of every page, and requests re-crawling
//! for pages that are not indexed.

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod http;
pub mod output;
pub mod site;
pub mod sitemap;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for a site audit run
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("No domain or site URL was provided")]
    MissingInput,

    #[error("Credential file not found: {path}")]
    MissingCredentials { path: String },

    #[error("Failed to acquire access token: {0}")]
    TokenAcquisition(#[source] AuthError),

    #[error("No sitemaps found for {site}")]
    NoSitemaps { site: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

impl IndexerError {
    /// Returns true for the guards that end a run before any page is inspected
    pub fn is_fatal_guard(&self) -> bool {
        matches!(
            self,
            Self::MissingInput
                | Self::MissingCredentials { .. }
                | Self::TokenAcquisition(_)
                | Self::NoSitemaps { .. }
        )
    }
}

/// Errors raised while talking to a remote endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server error code {status}\n{body}")]
    Server { status: u16, body: String },

    #[error("Request body cannot be replayed for {url}")]
    Unreplayable { url: String },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] ::url::ParseError),
}

/// Service account and token errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credential file not found: {0}")]
    MissingKeyFile(String),

    #[error("Failed to read credential file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid service account key: {0}")]
    InvalidKey(#[from] serde_json::Error),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token endpoint rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Token request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Token endpoint returned an empty access token")]
    EmptyToken,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Result type alias for remote API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use audit::{Coordinator, IndexingOutcome, RunSummary};
pub use config::Config;
pub use site::SiteUrl;
pub use state::IndexingStatus;
pub use storage::{StatusCache, StatusRecord};
