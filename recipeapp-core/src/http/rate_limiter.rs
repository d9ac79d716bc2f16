//! Per-host request pacing.

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Keeps consecutive requests to the same host at least `min_delay` apart.
///
/// Uses the tokio clock so paused-time tests can observe the pacing.
pub struct RateLimiter {
    min_delay: Duration,
    /// Earliest instant the next request to each host may start.
    next_slot: DashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            next_slot: DashMap::new(),
        }
    }

    /// A limiter that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.min_delay.is_zero()
    }

    /// Wait until `host` may be contacted again, then reserve the next slot.
    pub async fn wait(&self, host: &str) {
        if !self.is_enabled() {
            return;
        }

        let now = Instant::now();
        // The entry guard is dropped before sleeping so other hosts are not blocked.
        let start = {
            let mut slot = self.next_slot.entry(host.to_string()).or_insert(now);
            let start = (*slot).max(now);
            *slot = start + self.min_delay;
            start
        };

        if start > now {
            tracing::debug!(host, wait_ms = (start - now).as_millis() as u64, "rate limited");
            sleep_until(start).await;
        }
    }

    pub fn tracked_hosts(&self) -> usize {
        self.next_slot.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::disabled()
    }
}
