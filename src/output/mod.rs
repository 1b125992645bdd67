//! Output module for console progress and summaries
//!
//! This module handles the human-readable lines of a run:
//! - Progress while discovering and checking pages
//! - The per-status summary and the list of indexable pages
//! - One line per indexing attempt
//! - Messages for the fatal guards

mod console;

pub use console::{
    fatal_message, indexing_outcome_message, print_all_done, print_batch_complete,
    print_discovery, print_fatal, print_indexable, print_indexing_outcome,
    print_processing_site, print_processing_url, print_status_summary, status_line,
};
