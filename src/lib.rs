//! Wikifrontier: a topical crawler for encyclopedia content graphs
//!
//! This crate crawls an encyclopedia's article/category network outward from
//! configured portals and categories, scores every visited article against a
//! weighted keyword model, and checkpoints the accepted pages after every
//! batch so a long crawl never loses collected work.

pub mod config;
pub mod crawler;
pub mod fetcher;
pub mod output;
pub mod relevance;
pub mod state;
pub mod title;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Wikifrontier operations
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid title: {0}")]
    Title(#[from] TitleError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetcher::FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Every variant is fatal: the run stops before any page is fetched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unreadable entry-point list {}: {source}", path.display())]
    EntryPointList {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid entry point '{name}': {source}")]
    EntryPoint { name: String, source: TitleError },
}

/// Node identifier errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("title is empty")]
    Empty,

    #[error("title '{title}' contains illegal character '{ch}'")]
    IllegalCharacter { title: String, ch: char },

    #[error("title '{title}' is not in the {expected} namespace")]
    WrongNamespace {
        title: String,
        expected: &'static str,
    },
}

/// Result type alias for Wikifrontier operations
pub type Result<T> = std::result::Result<T, FrontierError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for title operations
pub type TitleResult<T> = std::result::Result<T, TitleError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, CrawlScheduler};
pub use relevance::RelevanceScorer;
pub use state::{NodeState, RunStatistics, VisitedRegistry};
pub use title::Title;
