//! Sitemap discovery
//!
//! This module finds every page of a site:
//! - Listing the sitemaps registered in Search Console
//! - Fetching each sitemap document (following sitemap indexes, gunzipping
//!   `.xml.gz` bodies)
//! - Extracting and deduplicating page URLs

mod discovery;
mod parser;

pub use discovery::{discover_pages, fetch_sitemap_pages, SitePages, MAX_INDEX_DEPTH};
pub use parser::{parse_sitemap, SitemapDocument, SitemapKind};

use crate::ApiError;
use thiserror::Error;

/// Errors raised while fetching a sitemap document
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Request for sitemap failed: {0}")]
    Api(#[from] ApiError),

    #[error("Sitemap {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decompress sitemap {url}: {source}")]
    Decompress {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
