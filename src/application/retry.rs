//! Timeout, bounded retry and exponential backoff for calls to external collaborators.

use crate::domain::errors::{ProviderError, Retryable};
use rand::Rng;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Per-attempt timeout
    pub timeout: Duration,
    pub base_delay: Duration,
    pub factor: f64,
    /// Upper bound for both computed backoff and server retry-after hints
    pub max_delay: Duration,
    /// Apply +/- 50% random jitter to the computed backoff
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(15),
            base_delay: Duration::from_millis(500),
            factor: 2.0,
            max_delay: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            timeout,
            ..Self::default()
        }
    }

    /// Backoff before retry number `retry` (0-based).
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let seconds = self.base_delay.as_secs_f64() * self.factor.powi(retry as i32);
        let capped = Duration::from_secs_f64(seconds.min(self.max_delay.as_secs_f64()).max(0.0));

        if !self.jitter {
            return capped;
        }

        let jitter_ms = (capped.as_millis() as f64 * 0.5) as u64;
        if jitter_ms == 0 {
            return capped;
        }
        let offset = rand::rng().random_range(0..=jitter_ms * 2);
        let total_ms = capped.as_millis() as i64 + offset as i64 - jitter_ms as i64;
        Duration::from_millis(total_ms.max(0) as u64)
    }

    /// [`run_observed`](Self::run_observed) without a retry hook.
    pub async fn run<T, E, F, Fut>(&self, source: &str, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + From<ProviderError> + fmt::Display,
    {
        self.run_observed(source, || {}, op).await
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. `on_retry` fires before each retry.
    pub async fn run_observed<T, E, F, Fut, R>(
        &self,
        source: &str,
        mut on_retry: R,
        mut op: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + From<ProviderError> + fmt::Display,
        R: FnMut(),
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(E::from(ProviderError::unavailable(
                    source,
                    format!("timed out after {:?}", self.timeout),
                ))),
            };

            let err = match result {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("RetryPolicy [{}]: succeeded on attempt {}", source, attempt);
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if attempt >= attempts {
                warn!(
                    "RetryPolicy [{}]: giving up after {} attempts: {}",
                    source, attempt, err
                );
                return Err(err);
            }

            let delay = err
                .retry_after()
                .map(|hint| hint.min(self.max_delay))
                .unwrap_or_else(|| self.delay_for_attempt(attempt - 1));

            warn!(
                "RetryPolicy [{}]: attempt {}/{} failed: {}. Retrying in {:?}",
                source, attempt, attempts, err, delay
            );
            on_retry();
            tokio::time::sleep(delay).await;
        }
    }
}
