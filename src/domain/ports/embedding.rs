//! Embedding provider port
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for semantic similarity search.

use async_trait::async_trait;

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Name of the underlying embedding model
    fn model_name(&self) -> &str;

    /// Embedding dimension for this provider/model
    fn dimensions(&self) -> usize;

    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    ///
    /// Outputs are returned in input order.
    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
