//! Site audit orchestration
//!
//! This module runs the whole pipeline for one site:
//! 1. Resolve the site identifier from user input
//! 2. Acquire an access token for the service account
//! 3. Discover sitemaps and pages
//! 4. Load the site's status cache
//! 5. Inspect stale or unknown pages in batches
//! 6. Save the updated cache
//! 7. Pick the pages worth an indexing request
//! 8. Probe and request indexing for each of them, one at a time

mod coordinator;
mod summary;

pub use coordinator::Coordinator;
pub use summary::{IndexingOutcome, RunSummary};

use crate::api::GoogleApiClient;
use crate::auth::ServiceAccount;
use crate::config::Config;
use crate::http::{build_http_client, RetryingClient};
use crate::site::SiteUrl;
use crate::{ApiError, AuthError, IndexerError};

/// Runs a complete audit for the site named by `input`
///
/// This is the main entry point. The guards are checked in order: missing
/// input, missing credential file, failed token acquisition, then (inside
/// [`Coordinator::run`]) zero sitemaps. Each one ends the run with its own
/// [`IndexerError`] variant before any page is inspected.
///
/// # Arguments
///
/// * `input` - Raw domain or site URL from the command line
/// * `config` - Run configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Run completed
/// * `Err(IndexerError)` - A guard tripped, or inspection/cache IO failed
pub async fn process_site(
    input: Option<&str>,
    config: &Config,
) -> Result<RunSummary, IndexerError> {
    let site = require_site(input)?;

    let client = build_http_client().map_err(ApiError::from)?;
    let http = RetryingClient::new(client, config.run.max_retries);

    let access_token = acquire_access_token(&http, config).await?;
    let api = GoogleApiClient::new(http, access_token, config.endpoints.clone());

    Coordinator::new(api, config.run.clone()).run(&site).await
}

/// Resolves the site identifier, the first of the run's guards
pub fn require_site(input: Option<&str>) -> Result<SiteUrl, IndexerError> {
    input
        .and_then(SiteUrl::from_input)
        .ok_or(IndexerError::MissingInput)
}

/// Loads the service account key and exchanges it for an access token
pub async fn acquire_access_token(
    http: &RetryingClient,
    config: &Config,
) -> Result<String, IndexerError> {
    let account = match ServiceAccount::load(&config.credentials.path) {
        Ok(account) => account,
        Err(AuthError::MissingKeyFile(path)) => {
            return Err(IndexerError::MissingCredentials { path })
        }
        Err(e) => return Err(IndexerError::TokenAcquisition(e)),
    };

    tracing::info!("Authenticating as {}", account.client_email());

    account
        .fetch_access_token(http, &config.endpoints.token)
        .await
        .map_err(IndexerError::TokenAcquisition)
}
