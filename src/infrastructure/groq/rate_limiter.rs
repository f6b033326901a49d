//! Token bucket rate limiter for outbound API requests

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::models::config::RateLimitConfig;

/// Token bucket limiter shared by all requests of one client.
///
/// The bucket refills continuously at `rate` tokens per second up to
/// `capacity`. Each request consumes one token; callers wait when the
/// bucket is empty.
#[derive(Clone)]
pub struct TokenBucketRateLimiter {
    state: Arc<Mutex<BucketState>>,
    rate: f64,
    capacity: f64,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucketRateLimiter {
    /// Create a limiter allowing `requests_per_second` with bursts of
    /// `burst_size` requests.
    pub fn new(requests_per_second: f64, burst_size: u32) -> Self {
        let capacity = f64::from(burst_size.max(1));
        Self {
            state: Arc::new(Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            })),
            rate: requests_per_second.max(f64::MIN_POSITIVE),
            capacity,
        }
    }

    /// Acquire one token, sleeping until the bucket refills if needed
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                self.refill(&mut state);

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }

                // Seconds until one full token is available
                (1.0 - state.tokens) / self.rate
            };

            tokio::time::sleep(Duration::from_secs_f64(wait)).await;
        }
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
        state.last_refill = now;
    }

    #[cfg(test)]
    async fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock().await;
        self.refill(&mut state);
        state.tokens
    }
}

impl From<&RateLimitConfig> for TokenBucketRateLimiter {
    fn from(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_second, config.burst_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_immediate() {
        let limiter = TokenBucketRateLimiter::new(1.0, 3);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_when_bucket_empty() {
        let limiter = TokenBucketRateLimiter::new(2.0, 1);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;

        // Second acquire needs a full token at 2 tokens/sec
        assert!(start.elapsed() >= Duration::from_millis(450));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_caps_at_capacity() {
        let limiter = TokenBucketRateLimiter::new(10.0, 2);

        limiter.acquire().await;
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        let tokens = limiter.available_tokens().await;
        assert!((tokens - 2.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokens_refill_over_time() {
        let limiter = TokenBucketRateLimiter::new(1.0, 1);

        limiter.acquire().await;
        assert!(limiter.available_tokens().await < 1.0);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!((limiter.available_tokens().await - 1.0).abs() < 1e-9);
    }
}
