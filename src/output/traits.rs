//! Checkpointer trait and output errors
//!
//! A checkpointer receives the whole result set and the current statistics
//! after every batch and replaces whatever it wrote before. Readers must only
//! ever see a complete previous checkpoint or a complete new one.

use crate::crawler::ScrapedPage;
use crate::state::RunStatistics;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to replace checkpoint file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Checkpoint not found: {0}")]
    Missing(String),

    #[error("Invalid checkpoint data: {0}")]
    Format(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Durable sink for the result set
///
/// Called repeatedly with a growing result set; every call overwrites the
/// previous checkpoint. Errors are reported to the caller, which logs them
/// and carries on.
pub trait Checkpointer: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Replaces the stored checkpoint with `pages` and `stats`
    fn checkpoint(&self, pages: &[Arc<ScrapedPage>], stats: &RunStatistics) -> OutputResult<()>;
}
