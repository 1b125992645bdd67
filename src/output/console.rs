use crate::audit::IndexingOutcome;
use crate::site::SiteUrl;
use crate::state::IndexingStatus;
use crate::IndexerError;
use std::collections::BTreeMap;

pub fn print_processing_site(site: &SiteUrl) {
    println!("🔎 Processing site: {}", site);
}

pub fn print_discovery(page_count: usize, sitemap_count: usize) {
    println!("👉 Found {} URLs in {} sitemap", page_count, sitemap_count);
}

/// Progress callback for the checking batches
pub fn print_batch_complete(index: usize, total: usize) {
    println!("📦 Batch {} of {} complete", index + 1, total);
}

/// Formats one summary line, e.g. `• ✅ Submitted and indexed: 3 pages`
pub fn status_line(status: &IndexingStatus, count: usize) -> String {
    format!("• {} {}: {} pages", status.glyph(), status, count)
}

/// Prints the status of all pages, one line per status
pub fn print_status_summary(
    page_count: usize,
    pages_per_status: &BTreeMap<IndexingStatus, Vec<String>>,
) {
    println!();
    println!("👍 Done, here's the status of all {} pages:", page_count);
    for (status, pages) in pages_per_status {
        println!("{}", status_line(status, pages.len()));
    }
    println!();
}

pub fn print_indexable(pages: &[String]) {
    if pages.is_empty() {
        println!("✨ There are no pages that can be indexed. Everything is already indexed!");
    } else {
        println!("✨ Found {} pages that can be indexed.", pages.len());
        for url in pages {
            println!("• {}", url);
        }
    }
    println!();
}

pub fn print_processing_url(url: &str) {
    println!("📄 Processing url: {}", url);
}

/// Message shown for an indexing outcome, if any
///
/// Failures were already logged with their details, so only a short
/// pointer is returned for them.
pub fn indexing_outcome_message(outcome: &IndexingOutcome) -> Option<String> {
    match outcome {
        IndexingOutcome::Requested => Some(
            "🚀 Indexing requested successfully. It may take a few days for Google to process it."
                .to_string(),
        ),
        IndexingOutcome::AlreadyRequested => Some(
            "🕛 Indexing already requested previously. It may take a few days for Google to process it."
                .to_string(),
        ),
        IndexingOutcome::RequestFailed { status: Some(status) } => {
            Some(format!("❌ Indexing request failed with status {}.", status))
        }
        IndexingOutcome::RequestFailed { status: None } => {
            Some("❌ Indexing request could not be sent.".to_string())
        }
        IndexingOutcome::Skipped { .. } | IndexingOutcome::ProbeFailed => None,
    }
}

pub fn print_indexing_outcome(outcome: &IndexingOutcome) {
    if let Some(message) = indexing_outcome_message(outcome) {
        println!("{}", message);
    }
    println!();
}

pub fn print_all_done() {
    println!("👍 All done!");
    println!();
}

/// User-facing message for an error that ended the run
pub fn fatal_message(error: &IndexerError) -> String {
    match error {
        IndexerError::MissingInput => {
            "❌ Please provide a domain or site URL as the first argument.".to_string()
        }
        IndexerError::MissingCredentials { path } => format!(
            "❌ {} not found, please create a service account key and save it there.",
            path
        ),
        IndexerError::TokenAcquisition(e) => {
            format!("❌ Failed to get access token: {}", e)
        }
        IndexerError::NoSitemaps { .. } => {
            "❌ No sitemaps found, add them to Google Search Console and try again.".to_string()
        }
        other => format!("❌ {}", other),
    }
}

/// Prints the fatal message to stderr
pub fn print_fatal(error: &IndexerError) {
    eprintln!("{}", fatal_message(error));
    eprintln!();
}
