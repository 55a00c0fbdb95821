//! Configuration module for Wikifrontier
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and resolving the configured entry points into canonical titles.
//!
//! # Example
//!
//! ```no_run
//! use wikifrontier::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, EntryPoints, OutputConfig, RelevanceConfig, SeedConfig, WikiConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, resolve_entry_points};
