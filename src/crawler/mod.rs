//! Crawler module for the batch crawl over the content graph
//!
//! This module contains the core crawling logic, including:
//! - Frontier expansion from entry points and accepted pages
//! - The fetch worker pool with per-worker pacing
//! - The shared result set
//! - Batch scheduling, checkpointing and resume

mod coordinator;
mod expander;
mod page;
mod pool;
mod results;
mod scheduler;

pub use coordinator::{run_crawl, run_crawl_with, CrawlOptions};
pub use expander::{Candidate, FrontierExpander};
pub use page::ScrapedPage;
pub use pool::{fetch_deadline, Accepted, WorkerContext, WorkerPool};
pub use results::ResultSet;
pub use scheduler::{CrawlReport, CrawlScheduler};
