//! Embedding domain models
//!
//! Models for vector embeddings and retrieval results. These define the
//! embedding vocabulary in a provider-agnostic way.

use serde::{Deserialize, Serialize};

/// Embedding model families supported by the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingModel {
    /// MiniLM family (all-MiniLM-L6-v2), 384 dimensions
    MiniLmL6V2,

    /// MPNet family (all-mpnet-base-v2), 768 dimensions
    MpNetBaseV2,
}

impl EmbeddingModel {
    /// Resolve a configured model name to a supported family.
    ///
    /// Unrecognized names fall back to MiniLM, which matches the
    /// dimension expectations of most sentence-transformer deployments.
    pub fn parse(name: &str) -> Self {
        if name.to_lowercase().contains("mpnet") {
            Self::MpNetBaseV2
        } else {
            Self::MiniLmL6V2
        }
    }

    /// Returns the vector dimensions for this model
    pub fn dimensions(&self) -> usize {
        match self {
            Self::MiniLmL6V2 => 384,
            Self::MpNetBaseV2 => 768,
        }
    }

    /// Returns the canonical model identifier
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::MiniLmL6V2 => "sentence-transformers/all-MiniLM-L6-v2",
            Self::MpNetBaseV2 => "sentence-transformers/all-mpnet-base-v2",
        }
    }
}

impl Default for EmbeddingModel {
    fn default() -> Self {
        Self::MiniLmL6V2
    }
}

impl std::fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model_name())
    }
}

/// Search result from vector similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Chunk ID
    pub chunk_id: String,

    /// Path of the source document
    pub source_path: String,

    /// Index of the chunk within its document
    pub chunk_index: usize,

    /// Character offset of the chunk within its document
    pub start_offset: usize,

    /// Chunk text
    pub content: String,

    /// Distance metric (lower is better, 0 = identical)
    pub distance: f32,

    /// Normalized similarity score (0-1, higher is better)
    pub score: f32,
}

impl SearchResult {
    /// Create a new search result from a distance measurement
    pub fn new(
        chunk_id: String,
        source_path: String,
        chunk_index: usize,
        start_offset: usize,
        content: String,
        distance: f32,
    ) -> Self {
        // score = 1 / (1 + distance)
        let score = 1.0 / (1.0 + distance);

        Self {
            chunk_id,
            source_path,
            chunk_index,
            start_offset,
            content,
            distance,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_model_parse() {
        assert_eq!(
            EmbeddingModel::parse("sentence-transformers/all-MiniLM-L6-v2"),
            EmbeddingModel::MiniLmL6V2
        );
        assert_eq!(
            EmbeddingModel::parse("sentence-transformers/all-mpnet-base-v2"),
            EmbeddingModel::MpNetBaseV2
        );
        assert_eq!(EmbeddingModel::parse("MPNET-custom"), EmbeddingModel::MpNetBaseV2);
        assert_eq!(EmbeddingModel::parse("something-else"), EmbeddingModel::MiniLmL6V2);
    }

    #[test]
    fn test_embedding_model_dimensions() {
        assert_eq!(EmbeddingModel::MiniLmL6V2.dimensions(), 384);
        assert_eq!(EmbeddingModel::MpNetBaseV2.dimensions(), 768);
    }

    #[test]
    fn test_embedding_model_display() {
        assert_eq!(
            EmbeddingModel::MiniLmL6V2.to_string(),
            "sentence-transformers/all-MiniLM-L6-v2"
        );
    }

    #[test]
    fn test_search_result_score_calculation() {
        let result = SearchResult::new(
            "doc:chunk:0".to_string(),
            "doc.txt".to_string(),
            0,
            0,
            "content".to_string(),
            0.0, // distance = 0 means identical
        );

        // score = 1 / (1 + 0) = 1.0
        assert_eq!(result.score, 1.0);
    }
}
