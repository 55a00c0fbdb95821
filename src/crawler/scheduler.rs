//! Batch crawl scheduler
//!
//! Each cycle of the crawl loop:
//! 1. takes the next `batch-size` candidates off the pending queue
//! 2. dispatches them to the worker pool and waits for every result
//! 3. expands the outbound links of the pages accepted in the batch
//! 4. checkpoints the result set and statistics
//!
//! The loop ends when the pending queue is empty or the cancellation token
//! fires. The page cap needs no check here: the registry refuses new claims
//! once it is reached, so the queue drains on its own.

use super::expander::{Candidate, FrontierExpander};
use super::page::ScrapedPage;
use super::pool::{fetch_deadline, Accepted, WorkerContext, WorkerPool};
use super::results::ResultSet;
use crate::config::{Config, EntryPoints};
use crate::fetcher::PageFetcher;
use crate::output::Checkpointer;
use crate::relevance::RelevanceScorer;
use crate::state::{RegistryCounts, RunStatistics, RunStatus, VisitedRegistry};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Outcome of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub stats: RunStatistics,
    pub registry: RegistryCounts,
    /// Candidates admitted but never dispatched (non-zero only when interrupted)
    pub pending: usize,
}

impl CrawlReport {
    pub fn status(&self) -> RunStatus {
        self.stats.status
    }

    /// A run fails only if it fetched something and accepted nothing
    ///
    /// An empty frontier is a successful, empty run.
    pub fn is_success(&self) -> bool {
        self.stats.pages_attempted() == 0 || self.stats.pages_accepted > 0
    }
}

/// Drives the crawl from entry points to the final checkpoint
pub struct CrawlScheduler {
    registry: Arc<VisitedRegistry>,
    results: Arc<ResultSet>,
    scorer: Arc<RelevanceScorer>,
    expander: FrontierExpander,
    pool: WorkerPool,
    context: Arc<WorkerContext>,
    checkpointers: Vec<Box<dyn Checkpointer>>,
    pending: VecDeque<Candidate>,
    /// Pages carried over from an earlier run, re-expanded before the first batch
    restored: Vec<Arc<ScrapedPage>>,
    batch_size: usize,
    cancel: CancellationToken,
}

impl CrawlScheduler {
    /// Creates a scheduler for one run
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `fetcher` - Source of pages and graph edges
    /// * `config_hash` - Hash recorded in the run statistics
    pub fn new(config: &Config, fetcher: Arc<dyn PageFetcher>, config_hash: &str) -> Self {
        let registry = Arc::new(VisitedRegistry::new(config.crawler.max_total_pages));
        let results = Arc::new(ResultSet::new(RunStatistics::new(config_hash)));
        let scorer = Arc::new(RelevanceScorer::from_config(&config.relevance));

        let expander = FrontierExpander::new(
            Arc::clone(&fetcher),
            Arc::clone(&registry),
            Arc::clone(&scorer),
            &config.crawler,
        );

        let context = Arc::new(WorkerContext {
            fetcher,
            scorer: Arc::clone(&scorer),
            registry: Arc::clone(&registry),
            results: Arc::clone(&results),
            max_links: config.crawler.max_links_per_page,
            fetch_timeout: fetch_deadline(&config.wiki),
        });

        let pool = WorkerPool::new(
            config.crawler.concurrency,
            Duration::from_millis(config.wiki.request_delay_ms),
        );

        Self {
            registry,
            results,
            scorer,
            expander,
            pool,
            context,
            checkpointers: Vec::new(),
            pending: VecDeque::new(),
            restored: Vec::new(),
            batch_size: config.crawler.batch_size.max(1),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_checkpointers(mut self, checkpointers: Vec<Box<dyn Checkpointer>>) -> Self {
        self.checkpointers.extend(checkpointers);
        self
    }

    /// Uses `token` to stop the crawl between batches
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Seeds the run with pages accepted by an earlier run
    ///
    /// Restored pages are marked scraped so they are never fetched again.
    /// Their outbound links are expanded again at the start of [`run`], at
    /// the depth each page was admitted at, so nodes that were pending when
    /// the earlier run stopped are rediscovered.
    ///
    /// # Returns
    ///
    /// The number of pages restored (duplicates in the input are skipped)
    ///
    /// [`run`]: CrawlScheduler::run
    pub fn restore(&mut self, pages: Vec<ScrapedPage>) -> usize {
        let mut restored = 0;
        for page in pages {
            if !self.registry.restore_scraped(page.title()) {
                continue;
            }
            let relevant = self.scorer.is_relevant(page.relevance_score());
            let page = Arc::new(page);
            self.results.restore(Arc::clone(&page), relevant);
            self.restored.push(page);
            restored += 1;
        }
        restored
    }

    pub fn registry(&self) -> &Arc<VisitedRegistry> {
        &self.registry
    }

    pub fn results(&self) -> &Arc<ResultSet> {
        &self.results
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// Per-page failures never surface here, including a panicking fetch. The
    /// only error is a worker task that died outside a fetch; the result set
    /// is still finished as interrupted and checkpointed before it returns.
    pub async fn run(&mut self, entry_points: &EntryPoints) -> crate::Result<CrawlReport> {
        tracing::info!(
            "Starting crawl: {} portals, {} categories, cap {}",
            entry_points.portals.len(),
            entry_points.categories.len(),
            self.registry.max_total()
        );

        let mut status = RunStatus::Completed;

        if self.cancel.is_cancelled() {
            status = RunStatus::Interrupted;
        } else {
            let seeds = self.expander.expand_entry_points(entry_points).await;
            tracing::info!("Entry points yielded {} candidates", seeds.len());
            self.pending.extend(seeds);

            let restored = std::mem::take(&mut self.restored);
            if !restored.is_empty() {
                let mut admitted = 0;
                for page in &restored {
                    let candidates = self.expander.expand_links(page, page.depth());
                    admitted += candidates.len();
                    self.pending.extend(candidates);
                }
                tracing::info!(
                    "Restored pages yielded {} candidates from {} pages",
                    admitted,
                    restored.len()
                );
            }
        }

        while !self.pending.is_empty() {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "Crawl cancelled with {} candidates pending",
                    self.pending.len()
                );
                status = RunStatus::Interrupted;
                break;
            }

            let batch = self.next_batch();
            let batch_len = batch.len();

            let accepted = match self.pool.run_batch(batch, Arc::clone(&self.context)).await {
                Ok(accepted) => accepted,
                Err(e) => {
                    // Keep what was accepted so far before giving up
                    tracing::error!("Worker pool failed: {}", e);
                    self.results.finish(RunStatus::Interrupted);
                    self.checkpoint();
                    return Err(e.into());
                }
            };

            let admitted = self.expand(&accepted);
            self.results.record_batch();
            self.checkpoint();

            let counts = self.registry.counts();
            tracing::info!(
                "Batch done: {} fetched, {} accepted, {} new candidates; \
                 {} scraped, {} failed, {} pending",
                batch_len,
                accepted.len(),
                admitted,
                counts.scraped,
                counts.failed,
                self.pending.len()
            );
        }

        self.results.finish(status);
        self.checkpoint();

        let report = CrawlReport {
            stats: self.results.stats(),
            registry: self.registry.counts(),
            pending: self.pending.len(),
        };

        tracing::info!(
            "Crawl {}: {} pages accepted, {} failed",
            status.to_db_string(),
            report.stats.pages_accepted,
            report.stats.pages_failed
        );

        Ok(report)
    }

    fn next_batch(&mut self) -> Vec<Candidate> {
        let n = self.batch_size.min(self.pending.len());
        self.pending.drain(..n).collect()
    }

    /// Expands the pages accepted in a batch, returning how many were admitted
    fn expand(&mut self, accepted: &[Accepted]) -> usize {
        let mut admitted = 0;
        for (page, depth) in accepted {
            let candidates = self.expander.expand_links(page, *depth);
            admitted += candidates.len();
            self.pending.extend(candidates);
        }
        admitted
    }

    /// Hands the current snapshot to every checkpointer, logging failures
    fn checkpoint(&self) {
        if self.checkpointers.is_empty() {
            return;
        }

        let (pages, stats) = self.results.snapshot();
        for checkpointer in &self.checkpointers {
            match checkpointer.checkpoint(&pages, &stats) {
                Ok(()) => tracing::debug!(
                    "Checkpoint '{}' written ({} pages)",
                    checkpointer.name(),
                    pages.len()
                ),
                Err(e) => tracing::warn!("Checkpoint '{}' failed: {}", checkpointer.name(), e),
            }
        }
    }
}
