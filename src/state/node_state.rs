/// Node state definitions for tracking crawl progress
///
/// A node moves `(unseen) -> Queued -> {Scraped | Failed}` and never leaves a
/// terminal state.
use std::fmt;

/// Represents the current state of a node in the visited registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Node has been claimed and is pending or in flight
    Queued,

    /// Node was fetched; it may or may not have been kept in the results
    Scraped,

    /// Node could not be fetched (missing page, timeout, transport error)
    Failed,
}

impl NodeState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued)
    }

    /// Returns a short lowercase name for logs and persisted records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Scraped => "scraped",
            Self::Failed => "failed",
        }
    }

    /// Parses a state from its short name
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "scraped" => Some(Self::Scraped),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
