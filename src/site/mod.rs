//! Site identifier handling
//!
//! This module turns raw user input into the property identifier the Search
//! Console API expects, and derives the per-site cache file name from it.

mod identifier;

pub use identifier::{cache_file_name, SiteUrl};
