//! Reusable retry-with-backoff policy.
//!
//! The Fetcher and Summarizer share this one policy instead of carrying
//! their own ad-hoc retry loops. The caller supplies the fallible operation
//! and a classifier deciding which errors are worth another attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retry policy with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (1 means no retries)
    pub max_attempts: u32,

    /// Delay before the first retry; doubles on each subsequent retry
    pub base_delay: Duration,

    /// Upper bound on any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(800),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Set the attempt bound.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the starting delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Backoff before retry number `retry` (1-based): base * 2^(retry-1),
    /// capped at `max_delay`.
    fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `is_transient` decides whether an error is worth another attempt.
    /// Exactly `max_attempts` calls are made when every attempt fails
    /// transiently; a permanent error returns after the attempt that
    /// produced it. The last error is returned on exhaustion.
    pub async fn run<T, E, F, Fut>(
        &self,
        label: &str,
        is_transient: impl Fn(&E) -> bool,
        mut op: F,
    ) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && is_transient(&e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        error = %e,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "{} failed, retrying",
                        label
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
