//! State module for tracking crawl progress
//!
//! This module provides the shared state of a crawl run.
//!
//! # Components
//!
//! - `NodeState`: Tri-state of a node (queued, scraped, failed)
//! - `VisitedRegistry`: Synchronized map of every node ever seen; the sole admission gate
//! - `WorkerPacer`: Per-worker minimum delay between fetches
//! - `RunStatistics`: Counters and timestamps persisted with each checkpoint

mod node_state;
mod pacer;
mod registry;
mod statistics;

// Re-export main types
pub use node_state::NodeState;
pub use pacer::WorkerPacer;
pub use registry::{ClaimOutcome, RegistryCounts, VisitedRegistry};
pub use statistics::{RunStatistics, RunStatus};
