//! Minimum-interval rate limiter shared by every REST call of a client
//!
//! The read-compare-sleep-update sequence runs under one async mutex.
//! Tokio's mutex queues waiters in FIFO order, so concurrent callers are
//! released one interval apart in arrival order.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{instrument, trace};

/// Default spacing between consecutive requests
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Gate that spaces consecutive acquisitions by at least `min_interval`
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Limiter that never waits (for testing)
    pub fn permissive() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the interval since the previous acquisition has elapsed,
    /// then record this acquisition
    ///
    /// The first acquisition on a fresh limiter returns immediately.
    #[instrument(skip(self), level = "trace")]
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                trace!(wait_ms = wait.as_millis() as u64, "Rate limited, sleeping");
                tokio::time::sleep(wait).await;
            }
        }

        *last_call = Some(Instant::now());
    }

    /// Instant of the most recent acquisition
    pub async fn last_call(&self) -> Option<Instant> {
        *self.last_call.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_does_not_wait() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_acquires_are_spaced() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_remaining_interval_is_slept() {
        let limiter = RateLimiter::default();
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(70)).await;

        let before = Instant::now();
        limiter.acquire().await;
        let waited = before.elapsed();
        assert!(waited >= Duration::from_millis(30));
        assert!(waited < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_never_overlap() {
        let limiter = Arc::new(RateLimiter::default());
        let mut handles = Vec::new();

        for _ in 0..5 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now()
            }));
        }

        let mut stamps = Vec::new();
        for handle in handles {
            stamps.push(handle.await.unwrap());
        }
        stamps.sort();

        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(100));
        }
    }
}
