//! Wikifrontier main entry point
//!
//! This is the command-line interface for the Wikifrontier topical crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wikifrontier::config::{load_config_with_hash, resolve_entry_points, Config, EntryPoints};
use wikifrontier::crawler::{run_crawl, CrawlOptions};
use wikifrontier::output::{print_statistics, FileCheckpointer};
use wikifrontier::state::RunStatus;

/// Wikifrontier: a topical encyclopedia crawler
///
/// Wikifrontier walks an encyclopedia's article and category graph outward
/// from configured portals and categories, keeps the articles that match a
/// weighted keyword model, and checkpoints the kept articles after every
/// batch.
#[derive(Parser, Debug)]
#[command(name = "wikifrontier")]
#[command(version)]
#[command(about = "A topical encyclopedia crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh crawl, ignoring any existing checkpoint
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "fresh"])]
    dry_run: bool,

    /// Show statistics from the last checkpoint and exit
    #[arg(long, conflicts_with_all = ["dry_run", "fresh"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.stats {
        handle_stats(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let entry_points =
        resolve_entry_points(&config.seeds).context("failed to resolve entry points")?;

    if cli.dry_run {
        handle_dry_run(&config, &entry_points);
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(&config, &config_hash, &entry_points, cli.fresh).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wikifrontier=info,warn"),
            1 => EnvFilter::new("wikifrontier=debug,info"),
            2 => EnvFilter::new("wikifrontier=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, entry_points: &EntryPoints) {
    println!("=== Wikifrontier Dry Run ===\n");

    println!("Encyclopedia:");
    println!("  API endpoint: {}", config.wiki.endpoint());
    println!("  User agent: {}", config.wiki.user_agent);
    println!("  Request delay: {}ms", config.wiki.request_delay_ms);
    println!(
        "  Timeout: {}s ({} retries)",
        config.wiki.timeout_secs, config.wiki.max_retries
    );

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max total pages: {}", config.crawler.max_total_pages);
    println!(
        "  Max pages per category: {}",
        config.crawler.max_pages_per_category
    );
    println!("  Max links per page: {}", config.crawler.max_links_per_page);
    println!("  Batch size: {}", config.crawler.batch_size);
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!(
        "  Filter portal links: {}",
        config.crawler.filter_portal_links
    );

    println!("\nRelevance:");
    println!("  Keywords: {}", config.relevance.keywords.join(", "));
    if !config.relevance.anchor_keywords.is_empty() {
        println!(
            "  Anchor keywords: {}",
            config.relevance.anchor_keywords.join(", ")
        );
    }
    println!("  Threshold: {}", config.relevance.threshold);
    println!(
        "  Weights: title {}, body {}, category {}",
        config.relevance.title_weight,
        config.relevance.body_weight,
        config.relevance.category_weight
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Basename: {}", config.output.basename);
    println!("  Compressed JSON: {}", config.output.compress);
    if let Some(path) = &config.output.database_path {
        println!("  Database: {}", path.display());
    }

    println!("\nPortals ({}):", entry_points.portals.len());
    for portal in &entry_points.portals {
        println!("  - {}", portal);
    }

    println!("\nCategories ({}):", entry_points.categories.len());
    for category in &entry_points.categories {
        println!("  - {}", category);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling from {} entry points",
        entry_points.len()
    );
}

/// Handles the --stats mode: shows statistics from the last checkpoint
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let checkpointer = FileCheckpointer::new(&config.output)?;
    println!("Checkpoint: {}\n", checkpointer.json_path().display());

    match checkpointer
        .load_stats()
        .context("failed to read checkpoint statistics")?
    {
        Some(stats) => print_statistics(&stats),
        None => println!("No checkpoint found."),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    entry_points: &EntryPoints,
    fresh: bool,
) -> anyhow::Result<ExitCode> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume from checkpoint if one exists)");
    }

    if entry_points.is_empty() {
        tracing::warn!("No portals or categories configured; nothing to crawl");
    }

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after the current batch");
                cancel.cancel();
            }
        })
    };

    let options = CrawlOptions { fresh, cancel };
    let result = run_crawl(config, config_hash, entry_points, options).await;
    ctrl_c.abort();

    let report = result.context("crawl failed")?;

    println!();
    print_statistics(&report.stats);

    if report.status() == RunStatus::Interrupted {
        tracing::warn!(
            "Crawl interrupted with {} candidates pending; rerun to resume",
            report.pending
        );
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!("No pages were accepted");
        Ok(ExitCode::FAILURE)
    }
}
