use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Interrupted,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            _ => None,
        }
    }
}

/// Counters and timestamps for one crawl run
///
/// Persisted with every checkpoint. Nothing in here changes unless a node is
/// resolved, a batch completes or the run finishes, so two checkpoints taken
/// back to back serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub status: RunStatus,
    pub config_hash: String,

    /// Completed batch cycles
    pub batches: u64,

    /// Pages in the result set, including restored ones
    pub pages_accepted: u64,

    /// Pages carried over from a previous checkpoint
    #[serde(default)]
    pub pages_restored: u64,

    /// Pages fetched but scored below the threshold
    pub pages_rejected: u64,

    /// Pages that could not be fetched, including missing ones
    pub pages_failed: u64,

    /// Subset of `pages_failed` that do not exist remotely
    pub pages_not_found: u64,

    /// Accepted pages scoring above the relevant-score mark
    pub relevant_pages: u64,

    /// Words across all accepted pages
    pub total_words: u64,
}

impl RunStatistics {
    /// Creates statistics for a run starting now
    pub fn new(config_hash: impl Into<String>) -> Self {
        Self::started_at(Utc::now(), config_hash)
    }

    pub fn started_at(started_at: DateTime<Utc>, config_hash: impl Into<String>) -> Self {
        Self {
            started_at,
            finished_at: None,
            duration_seconds: None,
            status: RunStatus::Running,
            config_hash: config_hash.into(),
            batches: 0,
            pages_accepted: 0,
            pages_restored: 0,
            pages_rejected: 0,
            pages_failed: 0,
            pages_not_found: 0,
            relevant_pages: 0,
            total_words: 0,
        }
    }

    pub fn record_accepted(&mut self, word_count: usize, relevant: bool) {
        self.pages_accepted += 1;
        self.total_words += word_count as u64;
        if relevant {
            self.relevant_pages += 1;
        }
    }

    /// Counts a page loaded from an earlier checkpoint
    pub fn record_restored(&mut self, word_count: usize, relevant: bool) {
        self.record_accepted(word_count, relevant);
        self.pages_restored += 1;
    }

    pub fn record_rejected(&mut self) {
        self.pages_rejected += 1;
    }

    pub fn record_failure(&mut self, not_found: bool) {
        self.pages_failed += 1;
        if not_found {
            self.pages_not_found += 1;
        }
    }

    pub fn record_batch(&mut self) {
        self.batches += 1;
    }

    /// Stamps the end of the run
    pub fn finish(&mut self, status: RunStatus, finished_at: DateTime<Utc>) {
        let elapsed = finished_at - self.started_at;
        self.finished_at = Some(finished_at);
        self.duration_seconds = Some(elapsed.num_milliseconds().max(0) as f64 / 1000.0);
        self.status = status;
    }

    /// Nodes for which a fetch was attempted during this run
    pub fn pages_attempted(&self) -> u64 {
        (self.pages_accepted - self.pages_restored) + self.pages_rejected + self.pages_failed
    }

    pub fn average_words(&self) -> f64 {
        if self.pages_accepted == 0 {
            return 0.0;
        }
        self.total_words as f64 / self.pages_accepted as f64
    }

    /// Share of accepted pages that are relevant, as a percentage
    pub fn relevant_ratio(&self) -> f64 {
        if self.pages_accepted == 0 {
            return 0.0;
        }
        (self.relevant_pages as f64 / self.pages_accepted as f64) * 100.0
    }
}
