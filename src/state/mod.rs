//! State module for page indexing status
//!
//! # Components
//!
//! - `IndexingStatus`: the coverage state Google reports for a page, plus the
//!   two local failure states (`Forbidden`, `Error`)

mod indexing_status;

pub use indexing_status::IndexingStatus;
