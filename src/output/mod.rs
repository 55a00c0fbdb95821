//! Output module for checkpointing crawl results
//!
//! This module handles:
//! - Writing the result set and statistics after every batch (files, SQLite)
//! - Loading the last checkpoint for resume and `--stats`
//! - Printing run statistics

mod files;
mod schema;
mod sqlite_output;
pub mod stats;
mod traits;

pub use files::{FileCheckpointer, HIGH_RELEVANCE_SCORE};
pub use sqlite_output::SqliteCheckpointer;
pub use stats::{format_statistics, print_statistics};
pub use traits::{Checkpointer, OutputError, OutputResult};

use crate::config::OutputConfig;

/// Builds the checkpointers an output configuration asks for
///
/// The file checkpointer is always present; the SQLite mirror only when a
/// database path is configured.
///
/// # Arguments
///
/// * `config` - The output configuration
///
/// # Returns
///
/// * `Ok(Vec<Box<dyn Checkpointer>>)` - The checkpointers, files first
/// * `Err(OutputError)` - The output directory or database could not be opened
pub fn build_checkpointers(config: &OutputConfig) -> OutputResult<Vec<Box<dyn Checkpointer>>> {
    let mut checkpointers: Vec<Box<dyn Checkpointer>> =
        vec![Box::new(FileCheckpointer::new(config)?)];

    if let Some(path) = &config.database_path {
        checkpointers.push(Box::new(SqliteCheckpointer::open(path)?));
    }

    Ok(checkpointers)
}
