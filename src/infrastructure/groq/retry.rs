//! Retry policy with exponential backoff for transient API failures

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::domain::models::config::RetryConfig;

use super::error::GroqApiError;

/// Exponential backoff retry policy.
///
/// Backoff for attempt `n` is `initial * 2^n`, capped at the configured
/// maximum. Only errors reporting themselves as transient are retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff_ms: config.initial_backoff_ms,
            max_backoff_ms: config.max_backoff_ms,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit parameters
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Maximum number of retry attempts
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Backoff duration before retry attempt `attempt` (0-based)
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(multiplier)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }

    /// Returns true if `error` should be retried after `attempt` failures
    pub fn should_retry(&self, error: &GroqApiError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_transient()
    }

    /// Run `operation` until it succeeds, fails permanently, or the
    /// retry budget is exhausted.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, GroqApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GroqApiError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if self.should_retry(&error, attempt) => {
                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %error,
                        "Transient API error, backing off before retry"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
