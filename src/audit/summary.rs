use crate::site::SiteUrl;
use crate::state::IndexingStatus;
use std::collections::BTreeMap;

/// What happened to one indexable page in the final phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexingOutcome {
    /// Never submitted before; the publish request was accepted
    Requested,

    /// Never submitted before; the publish request failed (`None` for a
    /// transport failure)
    RequestFailed { status: Option<u16> },

    /// The metadata probe shows an earlier submission
    AlreadyRequested,

    /// The metadata probe returned an error status; nothing was sent
    Skipped { status: u16 },

    /// The metadata probe itself failed after retries
    ProbeFailed,
}

/// Result of one audit run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub site: SiteUrl,

    /// Number of sitemaps registered for the site
    pub sitemap_count: usize,

    /// Number of distinct pages across all sitemaps
    pub page_count: usize,

    /// Pages that were inspected this run (the rest came from the cache)
    pub inspected_count: usize,

    /// Every page, grouped by its current status
    pub pages_per_status: BTreeMap<IndexingStatus, Vec<String>>,

    /// Pages whose status is indexable, in status then sitemap order
    pub indexable: Vec<String>,

    /// Outcome of the indexing phase, one entry per indexable page
    pub outcomes: Vec<(String, IndexingOutcome)>,
}

impl RunSummary {
    /// Number of pages whose indexing request was accepted
    pub fn requested_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == IndexingOutcome::Requested)
            .count()
    }

    /// Pages currently reported with `status`
    pub fn pages_with(&self, status: &IndexingStatus) -> &[String] {
        self.pages_per_status
            .get(status)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
