//! Index build metadata
//!
//! Recorded once per rebuild and stored alongside the chunks. Answering
//! against an index built with a different embedding model produces
//! garbage distances, so the query path checks this record before
//! searching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata describing how the current index was built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Identifier of the build run that produced this index
    pub run_id: Uuid,

    /// Embedding model the stored vectors were produced with
    pub embedding_model: String,

    /// Dimensionality of the stored vectors
    pub dimensions: usize,

    /// Number of source documents ingested
    pub document_count: u64,

    /// When the index build completed
    pub built_at: DateTime<Utc>,
}

impl IndexMeta {
    /// Create metadata for a fresh build, stamped with the current time
    pub fn new(embedding_model: String, dimensions: usize, document_count: u64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            embedding_model,
            dimensions,
            document_count,
            built_at: Utc::now(),
        }
    }

    /// Returns true if `model_name` matches the model this index was
    /// built with
    pub fn matches_model(&self, model_name: &str) -> bool {
        self.embedding_model == model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_meta_new() {
        let meta = IndexMeta::new("sentence-transformers/all-MiniLM-L6-v2".to_string(), 384, 3);

        assert_eq!(meta.dimensions, 384);
        assert_eq!(meta.document_count, 3);
        assert!(meta.matches_model("sentence-transformers/all-MiniLM-L6-v2"));
        assert!(!meta.matches_model("sentence-transformers/all-mpnet-base-v2"));
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = IndexMeta::new("m".to_string(), 384, 1);
        let b = IndexMeta::new("m".to_string(), 384, 1);
        assert_ne!(a.run_id, b.run_id);
    }
}
