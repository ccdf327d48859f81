//! Retry policy
//!
//! One policy object decides whether a failed request is tried again and how
//! long to wait first. Rate-limit responses (`Retry-After` / 429) are handled
//! by the client before the policy is consulted and never use up attempts.

use crate::error::Error;
use std::time::Duration;

/// Exponential backoff policy with retry and give-up predicates
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub factor: Duration,
    /// Multiplier applied per further retry
    pub base: u32,
    /// Upper bound for a single delay
    pub max_backoff: Duration,
    /// Wait used when a rate-limit response carries no usable `Retry-After`
    pub default_retry_after: Duration,
    /// Errors worth retrying
    pub retryable: fn(&Error) -> bool,
    /// Errors that end retrying immediately, even if also retryable
    pub give_up: fn(&Error) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            factor: Duration::from_secs(2),
            base: 2,
            max_backoff: Duration::from_secs(300),
            default_retry_after: Duration::from_secs(60),
            retryable: Error::is_retryable,
            give_up: Error::is_client_error,
        }
    }
}

impl RetryPolicy {
    /// Create the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set total attempts
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the first retry delay
    #[must_use]
    pub fn with_factor(mut self, factor: Duration) -> Self {
        self.factor = factor;
        self
    }

    /// Set the fallback rate-limit wait
    #[must_use]
    pub fn with_default_retry_after(mut self, wait: Duration) -> Self {
        self.default_retry_after = wait;
        self
    }

    /// Whether `error`, raised on attempt number `attempt` (1-based), should
    /// be retried
    pub fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        attempt < self.max_attempts && !(self.give_up)(error) && (self.retryable)(error)
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let multiplier = self.base.saturating_pow(exponent);
        std::cmp::min(self.factor.saturating_mul(multiplier), self.max_backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.factor, Duration::from_secs(2));
        assert_eq!(policy.default_retry_after, Duration::from_secs(60));
    }

    #[test]
    fn test_backoff_is_exponential() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
        assert_eq!(policy.backoff(4), Duration::from_secs(16));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(40), Duration::from_secs(300));
    }

    #[test]
    fn test_should_retry_server_errors_until_budget() {
        let policy = RetryPolicy::default();
        let err = Error::http_status(503, "unavailable");

        assert!(policy.should_retry(&err, 1));
        assert!(policy.should_retry(&err, 4));
        assert!(!policy.should_retry(&err, 5));
    }

    #[test]
    fn test_client_errors_give_up() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(&Error::http_status(404, ""), 1));
        assert!(!policy.should_retry(&Error::http_status(401, ""), 1));
    }

    #[test]
    fn test_non_http_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(&Error::decode("bad body"), 1));
    }

    #[test]
    fn test_builder() {
        let policy = RetryPolicy::new()
            .with_max_attempts(0)
            .with_factor(Duration::from_millis(5))
            .with_default_retry_after(Duration::from_secs(1));
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.backoff(2), Duration::from_millis(10));
        assert_eq!(policy.default_retry_after, Duration::from_secs(1));
    }
}
