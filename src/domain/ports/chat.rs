//! Chat completion port
//!
//! Defines the trait for OpenAI-compatible chat providers. The query
//! engine and experiment driver depend on this trait rather than on a
//! concrete HTTP client so tests can substitute canned responders.

use async_trait::async_trait;

/// Trait for single-turn chat completion providers
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for `prompt` using the named model.
    ///
    /// Implementations own their retry and rate limiting policy; a
    /// returned error means the request failed after those were
    /// exhausted.
    async fn generate(&self, model: &str, prompt: &str) -> anyhow::Result<String>;
}
