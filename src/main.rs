//! Search-Indexer main entry point
//!
//! This is the command-line interface for auditing a site's indexing status.

use anyhow::Context;
use clap::Parser;
use search_indexer::audit::{process_site, require_site};
use search_indexer::config::load_optional_config;
use search_indexer::{output, IndexerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Search-Indexer: audit a site against Google's index
///
/// Reads the site's sitemaps from Search Console, checks the indexing status
/// of every page (reusing recent results from a local cache), and requests
/// indexing for pages Google has not indexed yet.
#[derive(Parser, Debug)]
#[command(name = "search-indexer")]
#[command(version)]
#[command(about = "Audit a site's pages against Google's index", long_about = None)]
struct Cli {
    /// Domain (example.com) or URL-prefix property (https://example.com/)
    #[arg(value_name = "SITE")]
    site: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Service account key file (overrides the configuration)
    #[arg(long, value_name = "PATH")]
    credentials: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("search_indexer=info,warn"),
            1 => EnvFilter::new("search_indexer=debug,info"),
            2 => EnvFilter::new("search_indexer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    require_site(cli.site.as_deref())?;

    let mut config =
        load_optional_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = cli.credentials {
        config.credentials.path = path;
    }

    let summary = process_site(cli.site.as_deref(), &config).await?;

    tracing::info!(
        "{}: {} pages, {} inspected, {} indexing requests sent",
        summary.site,
        summary.page_count,
        summary.inspected_count,
        summary.requested_count()
    );

    Ok(())
}

/// Prints the reason a run ended early
fn report_failure(error: &anyhow::Error) {
    match error.downcast_ref::<IndexerError>() {
        Some(e) if e.is_fatal_guard() => output::print_fatal(e),
        Some(e) => {
            tracing::error!("Run aborted: {}", e);
            output::print_fatal(e);
        }
        None => {
            tracing::error!("{:#}", error);
            eprintln!("❌ {:#}", error);
        }
    }
}
