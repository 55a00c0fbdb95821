//! Fixed-size fetch worker pool
//!
//! One batch at a time: the candidates of a batch go into a shared queue,
//! `concurrency` tokio tasks drain it, and the pool returns once every task
//! has finished. Each task:
//! - waits for its pacer (minimum delay since its own previous fetch)
//! - fetches the page in a task of its own under a deadline, so a panic in
//!   the fetcher fails that one candidate
//! - scores it and applies the outcome to the registry and result set
//!
//! Accepted pages are handed back to the caller for expansion; workers never
//! touch the pending queue.

use super::expander::Candidate;
use super::page::ScrapedPage;
use super::results::ResultSet;
use crate::config::WikiConfig;
use crate::fetcher::{FetchError, PageFetcher};
use crate::relevance::RelevanceScorer;
use crate::state::{VisitedRegistry, WorkerPacer};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;

/// Everything a worker needs to process a candidate
pub struct WorkerContext {
    pub fetcher: Arc<dyn PageFetcher>,
    pub scorer: Arc<RelevanceScorer>,
    pub registry: Arc<VisitedRegistry>,
    pub results: Arc<ResultSet>,
    /// Cap on outbound links stored per page
    pub max_links: usize,
    /// Deadline for one fetch, retries included
    pub fetch_timeout: Duration,
}

/// A page accepted during a batch, with the depth it was admitted at
pub type Accepted = (Arc<ScrapedPage>, u32);

/// Deadline covering every attempt the fetcher may make for one page
pub fn fetch_deadline(config: &WikiConfig) -> Duration {
    let attempts = config.max_retries + 1;
    Duration::from_secs(config.timeout_secs) * attempts
        + Duration::from_millis(config.request_delay_ms) * config.max_retries
}

/// Worker pool whose pacers live as long as the pool
pub struct WorkerPool {
    pacers: Vec<WorkerPacer>,
    min_delay: Duration,
}

impl WorkerPool {
    /// Creates a pool of `concurrency` workers
    ///
    /// # Arguments
    ///
    /// * `concurrency` - Number of workers (at least 1)
    /// * `min_delay` - Minimum delay between two fetches of one worker
    pub fn new(concurrency: usize, min_delay: Duration) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            pacers: (0..concurrency).map(|_| WorkerPacer::new(min_delay)).collect(),
            min_delay,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.pacers.len()
    }

    /// Fetches every candidate of a batch and waits for all of them
    ///
    /// Per-page failures are recorded as state transitions. The only error is
    /// a worker task that panicked or was aborted.
    pub async fn run_batch(
        &mut self,
        batch: Vec<Candidate>,
        ctx: Arc<WorkerContext>,
    ) -> Result<Vec<Accepted>, tokio::task::JoinError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.pacers.len().min(batch.len());
        let queue = Arc::new(Mutex::new(VecDeque::from(batch)));

        let mut pacers = std::mem::take(&mut self.pacers);
        let idle = pacers.split_off(workers);

        let mut tasks = JoinSet::new();
        for (id, pacer) in pacers.into_iter().enumerate() {
            let queue = Arc::clone(&queue);
            let ctx = Arc::clone(&ctx);
            tasks.spawn(worker_loop(id, pacer, queue, ctx));
        }

        let mut accepted = Vec::new();
        let mut returned = Vec::with_capacity(workers);
        let mut failure = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((pacer, mut pages)) => {
                    returned.push(pacer);
                    accepted.append(&mut pages);
                }
                Err(e) => {
                    tracing::error!("Fetch worker failed: {}", e);
                    returned.push(WorkerPacer::new(self.min_delay));
                    failure.get_or_insert(e);
                }
            }
        }

        returned.extend(idle);
        self.pacers = returned;

        match failure {
            Some(e) => Err(e),
            None => Ok(accepted),
        }
    }
}

async fn worker_loop(
    id: usize,
    mut pacer: WorkerPacer,
    queue: Arc<Mutex<VecDeque<Candidate>>>,
    ctx: Arc<WorkerContext>,
) -> (WorkerPacer, Vec<Accepted>) {
    let mut accepted = Vec::new();

    loop {
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some(candidate) = next else {
            break;
        };

        pacer.wait_turn().await;
        tracing::trace!("Worker {} fetching {}", id, candidate.title);

        if let Some(page) = process_candidate(&ctx, &candidate).await {
            accepted.push((page, candidate.depth));
        }
    }

    (pacer, accepted)
}

/// Fetches, scores and resolves one candidate
async fn process_candidate(
    ctx: &WorkerContext,
    candidate: &Candidate,
) -> Option<Arc<ScrapedPage>> {
    let title = &candidate.title;

    // A panicking fetch only fails its own candidate
    let fetcher = Arc::clone(&ctx.fetcher);
    let target = title.clone();
    let mut fetch = tokio::spawn(async move { fetcher.fetch_page(&target).await });

    let fetched = match tokio::time::timeout(ctx.fetch_timeout, &mut fetch).await {
        Ok(Ok(Ok(page))) => page,
        Ok(Ok(Err(e))) => {
            record_failure(ctx, candidate, &e);
            return None;
        }
        Ok(Err(e)) => {
            record_failure(ctx, candidate, &FetchError::Panicked(e.to_string()));
            return None;
        }
        Err(_) => {
            fetch.abort();
            record_failure(ctx, candidate, &FetchError::Timeout);
            return None;
        }
    };

    let score = ctx
        .scorer
        .score(title.as_str(), &fetched.text, &fetched.categories);

    if !ctx.scorer.accepts(title.as_str(), score) {
        tracing::debug!(
            "Rejected {} (score {:.2} below {:.2})",
            title,
            score,
            ctx.scorer.threshold()
        );
        ctx.registry.mark_scraped(title);
        ctx.results.record_rejected();
        return None;
    }

    let page = Arc::new(
        ScrapedPage::from_fetched(fetched, ctx.max_links, score, Utc::now())
            .with_depth(candidate.depth),
    );

    ctx.registry.mark_scraped(title);
    ctx.results
        .record_accepted(Arc::clone(&page), ctx.scorer.is_relevant(score));

    tracing::info!(
        "Accepted {} (score {:.2}, {} words, depth {})",
        title,
        score,
        page.word_count(),
        candidate.depth
    );

    Some(page)
}

fn record_failure(ctx: &WorkerContext, candidate: &Candidate, error: &FetchError) {
    tracing::warn!("Failed to fetch {}: {}", candidate.title, error);
    ctx.registry.mark_failed(&candidate.title);
    ctx.results.record_failure(error.is_not_found());
}
