//! Result set shared by the fetch workers
//!
//! Node states live in [`VisitedRegistry`] and page records and counters live
//! here, each behind its own lock. A worker updates the registry first and
//! the result set second, so while a batch is in flight the two can disagree
//! for a moment. Once [`WorkerPool::run_batch`] returns they agree: every
//! node marked scraped was counted as accepted or rejected, and every node
//! marked failed was counted as a failure. The scheduler only snapshots
//! between batches.
//!
//! [`VisitedRegistry`]: crate::state::VisitedRegistry
//! [`WorkerPool::run_batch`]: super::WorkerPool::run_batch

use super::page::ScrapedPage;
use crate::state::{RunStatistics, RunStatus};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Accepted pages and run statistics, shared by the workers of a batch
///
/// Pages and counters sit behind one lock so a snapshot never shows a page
/// without its statistics update (or the reverse).
pub struct ResultSet {
    inner: Mutex<ResultInner>,
}

struct ResultInner {
    pages: Vec<Arc<ScrapedPage>>,
    stats: RunStatistics,
}

impl ResultSet {
    pub fn new(stats: RunStatistics) -> Self {
        Self {
            inner: Mutex::new(ResultInner {
                pages: Vec::new(),
                stats,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ResultInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds the set with a page from an earlier checkpoint
    pub fn restore(&self, page: Arc<ScrapedPage>, relevant: bool) {
        let mut inner = self.lock();
        inner.stats.record_restored(page.word_count(), relevant);
        inner.pages.push(page);
    }

    pub fn record_accepted(&self, page: Arc<ScrapedPage>, relevant: bool) {
        let mut inner = self.lock();
        inner.stats.record_accepted(page.word_count(), relevant);
        inner.pages.push(page);
    }

    pub fn record_rejected(&self) {
        self.lock().stats.record_rejected();
    }

    pub fn record_failure(&self, not_found: bool) {
        self.lock().stats.record_failure(not_found);
    }

    pub fn record_batch(&self) {
        self.lock().stats.record_batch();
    }

    /// Stamps the end of the run with the given status
    pub fn finish(&self, status: RunStatus) {
        self.lock().stats.finish(status, Utc::now());
    }

    /// Consistent copy of the pages and statistics
    pub fn snapshot(&self) -> (Vec<Arc<ScrapedPage>>, RunStatistics) {
        let inner = self.lock();
        (inner.pages.clone(), inner.stats.clone())
    }

    pub fn stats(&self) -> RunStatistics {
        self.lock().stats.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
