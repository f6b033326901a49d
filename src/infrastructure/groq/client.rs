//! HTTP client for the Groq chat completions API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, instrument};

use crate::domain::models::config::{ApiConfig, RateLimitConfig, RetryConfig};
use crate::domain::ports::ChatModel;

use super::error::GroqApiError;
use super::rate_limiter::TokenBucketRateLimiter;
use super::retry::RetryPolicy;
use super::types::{ChatRequest, ChatResponse};

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// Owns connection pooling, authentication, rate limiting and retry
/// behavior. One instance is shared across all models in a run; the
/// model is selected per request.
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    temperature: f64,
    max_tokens: u32,
    retry_policy: RetryPolicy,
    rate_limiter: TokenBucketRateLimiter,
}

impl GroqClient {
    /// Build a client from configuration sections.
    ///
    /// Fails when the API key is absent, since every request would be
    /// rejected anyway.
    pub fn from_config(
        api: &ApiConfig,
        rate_limit: &RateLimitConfig,
        retry: &RetryConfig,
    ) -> Result<Self, GroqApiError> {
        let key = api.key.clone().ok_or_else(|| {
            GroqApiError::AuthenticationFailed(
                "no API key configured, set GROQ_API_KEY".to_string(),
            )
        })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
            GroqApiError::AuthenticationFailed(
                "API key contains characters not valid in a header".to_string(),
            )
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(api.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .gzip(true)
            .brotli(true)
            .build()?;

        debug!(
            base_url = %api.base_url,
            key = %scrub_key(&key),
            "Groq client initialized"
        );

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            temperature: api.temperature,
            max_tokens: api.max_tokens,
            retry_policy: RetryPolicy::from(retry),
            rate_limiter: TokenBucketRateLimiter::from(rate_limit),
        })
    }

    /// Send a chat completion request, applying rate limiting and the
    /// retry policy for transient failures.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, GroqApiError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/chat/completions", self.base_url);
        self.retry_policy
            .execute(|| self.execute_chat(&url, request))
            .await
    }

    async fn execute_chat(
        &self,
        url: &str,
        request: &ChatRequest,
    ) -> Result<ChatResponse, GroqApiError> {
        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GroqApiError::from_status(status, body));
        }

        let completion: ChatResponse = response.json().await?;
        debug!(
            completion_id = %completion.id,
            tokens = completion.usage.as_ref().map_or(0, |u| u.total_tokens),
            "Received chat completion"
        );

        Ok(completion)
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn generate(&self, model: &str, prompt: &str) -> anyhow::Result<String> {
        let request = ChatRequest::new(model, prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = self.send_chat(&request).await?;
        let content = response
            .first_content()
            .ok_or(GroqApiError::EmptyCompletion)?;

        Ok(content.to_string())
    }
}

/// Redact an API key down to a loggable prefix
fn scrub_key(key: &str) -> String {
    if key.chars().count() > 8 {
        let prefix: String = key.chars().take(8).collect();
        format!("{prefix}...[REDACTED]")
    } else {
        "[REDACTED]".to_string()
    }
}
