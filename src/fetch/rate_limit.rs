//! Per-API-name rate limiting
//!
//! Third-party dashboard APIs are shared public resources; the limiter spaces
//! request *issuance* per API name by a minimum interval. Calls are delayed,
//! never dropped, and names never delay each other. One limiter instance is
//! constructed at application start and shared by every consumer; there is no
//! ambient global state.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default minimum spacing between requests sharing an API name
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// Enforces a minimum interval between successive requests per API name
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    /// Next allowed issuance instant per API name
    slots: Mutex<HashMap<String, Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Creates a limiter with the default interval
    pub fn new() -> Self {
        Self::with_min_interval(DEFAULT_MIN_INTERVAL)
    }

    /// Creates a limiter with a custom interval
    pub fn with_min_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until a request tagged with `api_name` may be issued
    ///
    /// Reserves the next issuance slot under the lock, then sleeps outside it,
    /// so concurrent callers for the same name queue up in spaced slots rather
    /// than racing for one.
    pub async fn acquire(&self, api_name: &str) {
        let wait = {
            let mut slots = self
                .slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = match slots.get(api_name) {
                Some(&previous) => now.max(previous + self.min_interval),
                None => now,
            };
            slots.insert(api_name.to_string(), slot);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            debug!(api_name, wait_ms = wait.as_millis() as u64, "rate limit delay");
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_is_not_delayed() {
        let limiter = RateLimiter::with_min_interval(Duration::from_millis(200));
        let start = Instant::now();
        limiter.acquire("api").await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_second_call_same_name_is_spaced() {
        let limiter = RateLimiter::with_min_interval(Duration::from_millis(100));
        let start = Instant::now();
        limiter.acquire("api").await;
        limiter.acquire("api").await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_different_names_do_not_delay_each_other() {
        let limiter = RateLimiter::with_min_interval(Duration::from_millis(500));
        let start = Instant::now();
        limiter.acquire("weather").await;
        limiter.acquire("transit").await;
        limiter.acquire("news").await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_calls_are_delayed_not_dropped() {
        let limiter = RateLimiter::with_min_interval(Duration::from_millis(50));
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire("api").await;
        }
        // Three issuances spaced by two full intervals
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_concurrent_callers_queue_in_spaced_slots() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::with_min_interval(Duration::from_millis(60)));
        let start = Instant::now();
        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire("api").await })
            })
            .collect();
        for task in tasks {
            task.await.expect("task should not panic");
        }
        assert!(start.elapsed() >= Duration::from_millis(120));
    }
}
