//! Rate limiting implementation
//!
//! Sliding-window limiter: remembers the instants of the last `limit`
//! requests and holds the next caller back until the oldest of them has
//! aged out of the window.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiterConfig {
    /// Requests allowed per window
    pub limit: usize,
    /// Window length
    pub every: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            limit: 1,
            every: Duration::from_secs(2),
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(limit: usize, every: Duration) -> Self {
        Self { limit, every }
    }
}

/// Request budget shared by every clone
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    window: Arc<Mutex<VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let config = RateLimiterConfig {
            limit: config.limit.max(1),
            every: config.every,
        };
        Self {
            config,
            window: Arc::new(Mutex::new(VecDeque::with_capacity(config.limit))),
        }
    }

    /// The limiter's configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Wait until one more request fits in the budget, then claim it
    ///
    /// The window lock is held while sleeping so concurrent callers queue in
    /// arrival order.
    pub async fn acquire(&self) {
        let mut window = self.window.lock().await;

        if window.len() >= self.config.limit {
            if let Some(oldest) = window.pop_front() {
                let wait = self.config.every.saturating_sub(oldest.elapsed());
                if !wait.is_zero() {
                    debug!(wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
                    tokio::time::sleep(wait).await;
                }
            }
        }

        window.push_back(Instant::now());
    }

    /// Number of requests recorded in the current window
    #[cfg(test)]
    pub async fn in_flight(&self) -> usize {
        let window = self.window.lock().await;
        window
            .iter()
            .filter(|t| t.elapsed() < self.config.every)
            .count()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimiterConfig::default())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("limit", &self.config.limit)
            .field("every", &self.config.every)
            .finish()
    }
}
