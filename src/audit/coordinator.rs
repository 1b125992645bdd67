//! Audit coordinator - the main pipeline for one site
//!
//! Checking runs in bounded concurrent batches; everything else (sitemap
//! fetching, indexing requests) runs one request at a time.

use crate::api::{GoogleApiClient, STATUS_NEVER_SUBMITTED};
use crate::audit::{IndexingOutcome, RunSummary};
use crate::config::RunConfig;
use crate::http::run_batched;
use crate::output;
use crate::site::SiteUrl;
use crate::sitemap::discover_pages;
use crate::state::IndexingStatus;
use crate::storage::{cache_horizon, should_recheck, StatusCache, StatusRecord};
use crate::{ApiError, IndexerError};
use chrono::Utc;
use std::collections::BTreeMap;

/// A page after the checking phase
#[derive(Debug, Clone)]
struct CheckedPage {
    url: String,
    record: StatusRecord,
    /// True if the record came from an inspection call this run
    refreshed: bool,
}

/// Main audit coordinator
pub struct Coordinator {
    api: GoogleApiClient,
    run: RunConfig,
}

impl Coordinator {
    /// Creates a coordinator for an authenticated API client
    pub fn new(api: GoogleApiClient, run: RunConfig) -> Self {
        Self { api, run }
    }

    /// Runs the audit pipeline for one site
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - All phases completed
    /// * `Err(IndexerError::NoSitemaps)` - Discovery found no sitemaps
    /// * `Err(IndexerError)` - An inspection or cache operation failed; the
    ///   cache is not written in that case
    pub async fn run(&self, site: &SiteUrl) -> Result<RunSummary, IndexerError> {
        output::print_processing_site(site);

        let found = discover_pages(&self.api, site).await;
        if found.sitemaps.is_empty() {
            return Err(IndexerError::NoSitemaps {
                site: site.to_string(),
            });
        }
        output::print_discovery(found.pages.len(), found.sitemaps.len());

        let mut cache = StatusCache::load(site.cache_path(&self.run.cache_dir))?;
        let checked = self.check_pages(site, &found.pages, &cache).await?;

        let mut inspected_count = 0;
        for page in &checked {
            if page.refreshed {
                cache.insert(page.url.clone(), page.record.clone())?;
                inspected_count += 1;
            }
        }
        cache.save()?;

        tracing::info!(
            "Inspected {} of {} pages, {} served from cache",
            inspected_count,
            checked.len(),
            checked.len() - inspected_count
        );

        let pages_per_status = group_by_status(checked);
        output::print_status_summary(found.pages.len(), &pages_per_status);

        let indexable = indexable_pages(&pages_per_status);
        output::print_indexable(&indexable);

        let outcomes = self.submit_indexing_requests(&indexable).await;
        output::print_all_done();

        Ok(RunSummary {
            site: site.clone(),
            sitemap_count: found.sitemaps.len(),
            page_count: found.pages.len(),
            inspected_count,
            pages_per_status,
            indexable,
            outcomes,
        })
    }

    /// Resolves the status of every page, inspecting only those the cache
    /// cannot answer
    ///
    /// The cache is only read here; refreshed records are returned and
    /// written by the caller once every batch has settled.
    async fn check_pages(
        &self,
        site: &SiteUrl,
        pages: &[String],
        cache: &StatusCache,
    ) -> Result<Vec<CheckedPage>, ApiError> {
        let now = Utc::now();
        let horizon = cache_horizon(self.run.cache_horizon_days);
        let api = &self.api;

        run_batched(
            pages.to_vec(),
            self.run.batch_size,
            |url: String| async move {
                if let Some(record) = cache.get(&url) {
                    if !should_recheck(record, now, horizon) {
                        return Ok(CheckedPage {
                            record: record.clone(),
                            url,
                            refreshed: false,
                        });
                    }
                }

                let status = api.inspect_url(site, &url).await?;
                tracing::debug!("{} -> {}", url, status);
                Ok::<_, ApiError>(CheckedPage {
                    url,
                    record: StatusRecord::checked_now(status),
                    refreshed: true,
                })
            },
            output::print_batch_complete,
        )
        .await
    }

    /// Probes and, where needed, requests indexing for each page in turn
    ///
    /// Failures are reported and the loop moves on to the next page.
    async fn submit_indexing_requests(&self, pages: &[String]) -> Vec<(String, IndexingOutcome)> {
        let mut outcomes = Vec::with_capacity(pages.len());

        for url in pages {
            output::print_processing_url(url);
            let outcome = self.submit_one(url).await;
            output::print_indexing_outcome(&outcome);
            outcomes.push((url.clone(), outcome));
        }

        outcomes
    }

    async fn submit_one(&self, url: &str) -> IndexingOutcome {
        match self.api.get_publish_metadata(url).await {
            Ok(STATUS_NEVER_SUBMITTED) => match self.api.request_indexing(url).await {
                Ok(status) if status < 300 => IndexingOutcome::Requested,
                Ok(status) => IndexingOutcome::RequestFailed {
                    status: Some(status),
                },
                Err(e) => {
                    tracing::error!("Failed to request indexing of {}: {}", url, e);
                    IndexingOutcome::RequestFailed { status: None }
                }
            },
            Ok(status) if status < 400 => IndexingOutcome::AlreadyRequested,
            Ok(status) => IndexingOutcome::Skipped { status },
            Err(e) => {
                tracing::error!("Failed to get publish metadata of {}: {}", url, e);
                IndexingOutcome::ProbeFailed
            }
        }
    }
}

/// Groups pages by status, keeping page order within each group
fn group_by_status(checked: Vec<CheckedPage>) -> BTreeMap<IndexingStatus, Vec<String>> {
    let mut groups: BTreeMap<IndexingStatus, Vec<String>> = BTreeMap::new();
    for page in checked {
        groups.entry(page.record.status).or_default().push(page.url);
    }
    groups
}

/// Flattens the indexable groups into one list of pages
fn indexable_pages(groups: &BTreeMap<IndexingStatus, Vec<String>>) -> Vec<String> {
    groups
        .iter()
        .filter(|(status, _)| status.is_indexable())
        .flat_map(|(_, pages)| pages.iter().cloned())
        .collect()
}
