//! Vector index port
//!
//! Read/write interface over the persisted chunk index. The query
//! engine only needs search; ingestion inserts through the same trait
//! so the pipeline can be exercised end to end against a temp store.

use async_trait::async_trait;

use crate::domain::models::{Chunk, SearchResult};

/// Trait for persisted vector indexes
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert chunks with their embeddings. `chunks` and `embeddings`
    /// must be the same length and aligned by position.
    async fn insert_chunks(
        &self,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> anyhow::Result<usize>;

    /// Return the `limit` nearest chunks to the query embedding,
    /// closest first. An empty index yields an empty result, not an
    /// error.
    async fn search(&self, query: &[f32], limit: usize) -> anyhow::Result<Vec<SearchResult>>;

    /// Number of chunks currently in the index
    async fn chunk_count(&self) -> anyhow::Result<u64>;
}
