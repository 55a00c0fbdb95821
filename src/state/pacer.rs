use std::time::Duration;
use tokio::time::Instant;

/// Tracks request pacing for one fetch worker
///
/// Each worker owns one pacer for the whole run, so consecutive fetches by the
/// same worker are always at least `min_delay` apart, including across batch
/// boundaries. Pacing is per worker, not global.
#[derive(Debug, Clone)]
pub struct WorkerPacer {
    /// Minimum time between two fetches issued by this worker
    min_delay: Duration,

    /// When this worker last issued a fetch
    last_request_time: Option<Instant>,

    /// Number of fetches issued by this worker
    request_count: u64,
}

impl WorkerPacer {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request_time: None,
            request_count: 0,
        }
    }

    /// Checks if a request can be issued at `now`
    pub fn can_request(&self, now: Instant) -> bool {
        self.time_until_next_request(now).is_none()
    }

    /// Returns None if a request can be made now, or the duration to wait otherwise
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_delay {
            Some(self.min_delay - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was issued at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Waits until this worker may fetch again, then records the fetch
    pub async fn wait_turn(&mut self) {
        if let Some(wait) = self.time_until_next_request(Instant::now()) {
            tracing::trace!("Worker pacing: sleeping {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        self.record_request(Instant::now());
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }
}
