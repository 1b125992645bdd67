use crate::http::DEFAULT_MAX_RETRIES;
use crate::storage::CACHE_HORIZON_DAYS;
use serde::Deserialize;
use std::path::PathBuf;

/// Inspection requests in flight per batch when not configured
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Main configuration structure for Search-Indexer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub credentials: CredentialsConfig,
    pub endpoints: EndpointsConfig,
}

/// Run behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RunConfig {
    /// Number of inspection requests in flight per batch
    pub batch_size: usize,

    /// Retry budget for transient failures (network errors and 5xx)
    pub max_retries: u32,

    /// Directory holding one status cache file per site
    pub cache_dir: PathBuf,

    /// Age after which any cached status is rechecked
    pub cache_horizon_days: i64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            cache_dir: PathBuf::from(".cache"),
            cache_horizon_days: CACHE_HORIZON_DAYS,
        }
    }
}

/// Service account key location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Path to the service account key (JSON)
    pub path: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./service_account.json"),
        }
    }
}

/// Base URLs of the remote APIs
///
/// Only the scheme and authority matter; request paths are appended by the
/// API clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EndpointsConfig {
    /// URL inspection API
    pub search_console: String,

    /// Sitemap listing API
    pub webmasters: String,

    /// Publish metadata and notification API
    pub indexing: String,

    /// OAuth token endpoint, used when the key file has no `token_uri`
    pub token: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            search_console: "https://searchconsole.googleapis.com".to_string(),
            webmasters: "https://www.googleapis.com".to_string(),
            indexing: "https://indexing.googleapis.com".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

impl EndpointsConfig {
    /// Points every endpoint at the same base URL (mock servers, proxies)
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            search_console: base.to_string(),
            webmasters: base.to_string(),
            indexing: base.to_string(),
            token: format!("{}/token", base),
        }
    }
}
