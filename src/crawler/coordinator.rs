//! Crawl coordinator - wires one run together
//!
//! This module builds everything a run needs from the configuration:
//! - the page fetcher for the configured encyclopedia
//! - the checkpointers for the output configuration
//! - the resume state from the last file checkpoint (unless starting fresh)
//!
//! and then hands control to the [`CrawlScheduler`].

use super::scheduler::{CrawlReport, CrawlScheduler};
use crate::config::{Config, EntryPoints};
use crate::fetcher::{PageFetcher, WikiFetcher};
use crate::output::{build_checkpointers, FileCheckpointer};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-run options that do not belong in the configuration file
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Ignore any existing checkpoint and start from the entry points alone
    pub fresh: bool,

    /// Stops the crawl between batches when cancelled
    pub cancel: CancellationToken,
}

/// Runs a crawl against the configured encyclopedia
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `config_hash` - Hash of the configuration file, recorded in the statistics
/// * `entry_points` - The resolved portals and categories
/// * `options` - Resume and cancellation options
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished (completed or interrupted)
/// * `Err(FrontierError)` - Setup failed or a worker panicked
///
/// # Example
///
/// ```no_run
/// use wikifrontier::config::{load_config_with_hash, resolve_entry_points};
/// use wikifrontier::crawler::{run_crawl, CrawlOptions};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let entry_points = resolve_entry_points(&config.seeds)?;
/// let report = run_crawl(&config, &hash, &entry_points, CrawlOptions::default()).await?;
/// println!("{} pages accepted", report.stats.pages_accepted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    config_hash: &str,
    entry_points: &EntryPoints,
    options: CrawlOptions,
) -> crate::Result<CrawlReport> {
    let fetcher = WikiFetcher::new(&config.wiki)?;
    tracing::info!("Using API endpoint {}", fetcher.endpoint());

    run_crawl_with(config, config_hash, entry_points, Arc::new(fetcher), options).await
}

/// Runs a crawl with a caller-supplied fetcher
///
/// Unless `options.fresh` is set, pages from the last file checkpoint are
/// restored first: they are kept in the result set and never fetched again,
/// and their links are expanded again so unfinished frontier nodes come back.
/// A checkpoint that exists but cannot be read stops the
/// run before anything is fetched.
pub async fn run_crawl_with(
    config: &Config,
    config_hash: &str,
    entry_points: &EntryPoints,
    fetcher: Arc<dyn PageFetcher>,
    options: CrawlOptions,
) -> crate::Result<CrawlReport> {
    let previous = if options.fresh {
        tracing::info!("Starting fresh; any existing checkpoint will be overwritten");
        None
    } else {
        FileCheckpointer::new(&config.output)?.load_pages()?
    };

    let checkpointers = build_checkpointers(&config.output)?;

    let mut scheduler = CrawlScheduler::new(config, fetcher, config_hash)
        .with_checkpointers(checkpointers)
        .with_cancellation(options.cancel);

    match previous {
        Some(pages) => {
            let found = pages.len();
            let restored = scheduler.restore(pages);
            tracing::info!(
                "Resuming from checkpoint: {} pages restored ({} in file)",
                restored,
                found
            );
        }
        None if !options.fresh => tracing::info!("No checkpoint found, starting new run"),
        None => {}
    }

    scheduler.run(entry_points).await
}
