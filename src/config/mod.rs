//! Configuration module for Search-Indexer
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every field has a default, so a missing file yields
//! the stock behavior (batches of 50, five retries, a 14-day cache horizon).
//!
//! # Example
//!
//! ```no_run
//! use search_indexer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("indexer.toml")).unwrap();
//! println!("Inspecting in batches of {}", config.run.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CredentialsConfig, EndpointsConfig, RunConfig, DEFAULT_BATCH_SIZE};

// Re-export parser functions
pub use parser::{load_config, load_optional_config};
pub use validation::validate;
