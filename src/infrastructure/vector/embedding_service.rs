//! Embedding service implementation
//!
//! Note: this is a simplified implementation that generates deterministic
//! hash-based embeddings. For production retrieval quality you would
//! integrate candle-transformers with the configured sentence transformer
//! model; the interface stays the same.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::EmbeddingModel;
use crate::domain::ports::EmbeddingService;

/// Local embedding service.
///
/// Generates deterministic embeddings from text content: the same text
/// always maps to the same unit vector, which is what rebuild
/// determinism and the retrieval pipeline depend on.
#[derive(Default)]
pub struct LocalEmbeddingService {
    model: EmbeddingModel,
}

impl LocalEmbeddingService {
    /// Create a service for a supported model family
    pub fn new(model: EmbeddingModel) -> Self {
        tracing::warn!(
            model = %model,
            "LocalEmbeddingService uses a simplified hash-based embedding; \
             semantic quality requires a real sentence transformer"
        );

        Self { model }
    }

    /// Create a service from a configured model name
    pub fn from_name(name: &str) -> Self {
        Self::new(EmbeddingModel::parse(name))
    }

    /// Generate a deterministic embedding for the given text.
    ///
    /// Values are derived from the text bytes and the dimension index,
    /// then L2-normalized so cosine math behaves.
    pub fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let dimensions = self.model.dimensions();
        let mut embedding = vec![0.0; dimensions];

        let text_bytes = text.as_bytes();

        for (i, val) in embedding.iter_mut().enumerate() {
            let byte_val = if text_bytes.is_empty() {
                0
            } else {
                text_bytes[i % text_bytes.len()]
            };

            *val = ((byte_val as usize * 31 + i * 17) % 256) as f32 / 255.0 - 0.5;
        }

        // f64 accumulation avoids drift over several hundred dimensions
        let magnitude_f64: f64 = embedding
            .iter()
            .map(|x| f64::from(*x) * f64::from(*x))
            .sum::<f64>()
            .sqrt();
        let magnitude = magnitude_f64 as f32;

        if magnitude > 1e-10 {
            for val in &mut embedding {
                *val /= magnitude;
            }
        } else {
            // Degenerate input still yields a valid unit vector
            let uniform_val = 1.0 / (dimensions as f32).sqrt();
            for val in &mut embedding {
                *val = uniform_val;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingService for LocalEmbeddingService {
    fn model_name(&self) -> &str {
        self.model.model_name()
    }

    fn dimensions(&self) -> usize {
        self.model.dimensions()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.generate_embedding(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.generate_embedding(text));
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embed_single() {
        let service = LocalEmbeddingService::new(EmbeddingModel::MiniLmL6V2);

        let embedding = service
            .embed("What is the first-line treatment protocol?")
            .await
            .expect("Failed to generate embedding");

        assert_eq!(embedding.len(), 384);
    }

    #[tokio::test]
    async fn test_embed_batch_preserves_order() {
        let service = LocalEmbeddingService::new(EmbeddingModel::MiniLmL6V2);

        let texts = vec![
            "malaria".to_string(),
            "tuberculosis".to_string(),
            "dengue".to_string(),
        ];
        let batch = service.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 3);
        for (text, batched) in texts.iter().zip(&batch) {
            let single = service.embed(text).await.unwrap();
            assert_eq!(&single, batched);
        }
    }

    #[tokio::test]
    async fn test_deterministic() {
        let service = LocalEmbeddingService::new(EmbeddingModel::MiniLmL6V2);

        let text = "Guideline text for deterministic embedding";
        let emb1 = service.embed(text).await.unwrap();
        let emb2 = service.embed(text).await.unwrap();

        assert_eq!(emb1, emb2);
    }

    #[test]
    fn test_from_name_selects_family() {
        let minilm = LocalEmbeddingService::from_name("sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(minilm.dimensions(), 384);

        let mpnet = LocalEmbeddingService::from_name("sentence-transformers/all-mpnet-base-v2");
        assert_eq!(mpnet.dimensions(), 768);
    }

    #[test]
    fn test_normalized_embeddings() {
        let service = LocalEmbeddingService::new(EmbeddingModel::MiniLmL6V2);

        let embedding = service.generate_embedding("test");

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_text_is_valid_unit_vector() {
        let service = LocalEmbeddingService::new(EmbeddingModel::MiniLmL6V2);

        let embedding = service.generate_embedding("");

        assert_eq!(embedding.len(), 384);
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.001);
    }
}
