//! Query engine
//!
//! Produces answers to medical questions in two modes: a plain prompt
//! sent straight to the chat model, and a grounded prompt that packs
//! the most relevant guideline chunks into the context window first.
//! Both modes share one chat client so rate limiting and retries apply
//! uniformly across an experiment run.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::models::SearchResult;
use crate::domain::ports::{ChatModel, EmbeddingService, VectorIndex};

/// A grounded answer together with the chunks it was grounded in
#[derive(Debug, Clone)]
pub struct GroundedAnswer {
    /// The model's response text
    pub answer: String,

    /// Retrieved chunks that were packed into the prompt, closest first
    pub sources: Vec<SearchResult>,
}

/// Answers questions with and without retrieved guideline context
pub struct QueryEngine {
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl QueryEngine {
    /// Create a new query engine
    ///
    /// # Arguments
    /// * `chat` - Chat completion provider
    /// * `embedder` - Embedding provider for query vectors
    /// * `index` - Vector index over the ingested corpus
    /// * `top_k` - Number of chunks to retrieve per grounded question
    pub fn new(
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
    ) -> Self {
        Self {
            chat,
            embedder,
            index,
            top_k,
        }
    }

    /// Answer a question without any retrieved context
    pub async fn plain_answer(&self, model: &str, question: &str) -> Result<String> {
        let prompt = build_plain_prompt(question);
        self.chat
            .generate(model, &prompt)
            .await
            .with_context(|| format!("plain completion failed for model {model}"))
    }

    /// Answer a question grounded in retrieved guideline chunks.
    ///
    /// An empty index is not an error: the prompt then carries an empty
    /// context block, and the grounding rules instruct the model to say
    /// the information is not available.
    pub async fn grounded_answer(&self, model: &str, question: &str) -> Result<GroundedAnswer> {
        let sources = self.retrieve(question).await?;
        let context = join_context(&sources);
        let prompt = build_grounded_prompt(&context, question);

        let answer = self
            .chat
            .generate(model, &prompt)
            .await
            .with_context(|| format!("grounded completion failed for model {model}"))?;

        Ok(GroundedAnswer { answer, sources })
    }

    /// Retrieve the chunks most relevant to `question`, closest first
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let query = self
            .embedder
            .embed(question)
            .await
            .context("failed to embed question")?;

        let results = self.index.search(&query, self.top_k).await?;
        debug!(
            results = results.len(),
            top_k = self.top_k,
            "retrieved context chunks"
        );

        Ok(results)
    }
}

/// Join retrieved chunk texts into a single context block
fn join_context(sources: &[SearchResult]) -> String {
    sources
        .iter()
        .map(|result| result.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for the ungrounded baseline
fn build_plain_prompt(question: &str) -> String {
    format!(
        "You are an informational health assistant.\n\
         Do not provide diagnosis or treatment.\n\
         Answer the question in 4\u{2013}6 concise sentences (approximately 80\u{2013}120 words).\n\
         If you are unsure, say you do not know.\n\
         \n\
         QUESTION: {question}"
    )
}

/// Prompt carrying retrieved WHO guidance
fn build_grounded_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a clinical decision support assistant.\n\
         Use the provided WHO guidance when relevant.\n\
         Do not provide diagnosis or treatment.\n\
         \n\
         Rules:\n\
         1. If the WHO guidance supports an answer, use it.\n\
         2. If the guidance is insufficient, clearly state that the information is not available and respond concisely without speculation.\n\
         3. Answer in 4\u{2013}6 concise sentences (approximately 80\u{2013}120 words).\n\
         4. You may reference WHO guidance explicitly.\n\
         \n\
         WHO CONTEXT: {context}\n\
         QUESTION: {question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::models::Chunk;

    /// Chat stub that records prompts and replays a canned response
    struct RecordingChat {
        prompts: Mutex<Vec<(String, String)>>,
        response: String,
    }

    impl RecordingChat {
        fn new(response: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                response: response.to_string(),
            }
        }

        fn recorded(&self) -> Vec<(String, String)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for RecordingChat {
        async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            Ok(self.response.clone())
        }
    }

    /// Embedder stub returning a fixed unit vector
    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingService for FixedEmbedder {
        fn model_name(&self) -> &str {
            "fixed"
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    /// Index stub replaying fixed results
    struct FixedIndex {
        results: Vec<SearchResult>,
    }

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn insert_chunks(
            &self,
            _chunks: &[Chunk],
            _embeddings: &[Vec<f32>],
        ) -> Result<usize> {
            Ok(0)
        }

        async fn search(&self, _query: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
            Ok(self.results.iter().take(limit).cloned().collect())
        }

        async fn chunk_count(&self) -> Result<u64> {
            Ok(self.results.len() as u64)
        }
    }

    fn result(content: &str) -> SearchResult {
        SearchResult::new(
            "doc:chunk:0".to_string(),
            "doc.txt".to_string(),
            0,
            0,
            content.to_string(),
            0.1,
        )
    }

    fn engine_with(results: Vec<SearchResult>, chat: Arc<RecordingChat>) -> QueryEngine {
        QueryEngine::new(
            chat,
            Arc::new(FixedEmbedder),
            Arc::new(FixedIndex { results }),
            5,
        )
    }

    #[tokio::test]
    async fn test_plain_prompt_contains_question_and_no_context() {
        let chat = Arc::new(RecordingChat::new("answer"));
        let engine = engine_with(vec![], Arc::clone(&chat));

        let answer = engine
            .plain_answer("llama-3.1-8b-instant", "What causes malaria?")
            .await
            .unwrap();

        assert_eq!(answer, "answer");
        let recorded = chat.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "llama-3.1-8b-instant");
        assert!(recorded[0].1.contains("QUESTION: What causes malaria?"));
        assert!(recorded[0].1.contains("informational health assistant"));
        assert!(!recorded[0].1.contains("WHO CONTEXT"));
    }

    #[tokio::test]
    async fn test_grounded_prompt_packs_retrieved_chunks() {
        let chat = Arc::new(RecordingChat::new("grounded answer"));
        let engine = engine_with(
            vec![result("Nets prevent bites."), result("Spraying helps.")],
            Arc::clone(&chat),
        );

        let grounded = engine
            .grounded_answer("llama-3.3-70b-versatile", "How to prevent malaria?")
            .await
            .unwrap();

        assert_eq!(grounded.answer, "grounded answer");
        assert_eq!(grounded.sources.len(), 2);

        let recorded = chat.recorded();
        let prompt = &recorded[0].1;
        assert!(prompt.contains("clinical decision support assistant"));
        assert!(prompt.contains("WHO CONTEXT: Nets prevent bites.\nSpraying helps."));
        assert!(prompt.contains("QUESTION: How to prevent malaria?"));
    }

    #[tokio::test]
    async fn test_grounded_answer_tolerates_empty_index() {
        let chat = Arc::new(RecordingChat::new("not available"));
        let engine = engine_with(vec![], Arc::clone(&chat));

        let grounded = engine
            .grounded_answer("llama-3.1-8b-instant", "What about dengue?")
            .await
            .unwrap();

        assert!(grounded.sources.is_empty());
        let recorded = chat.recorded();
        assert!(recorded[0].1.contains("WHO CONTEXT: \n"));
    }

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let chat = Arc::new(RecordingChat::new("x"));
        let results: Vec<SearchResult> = (0..10).map(|i| result(&format!("chunk {i}"))).collect();
        let engine = QueryEngine::new(
            chat,
            Arc::new(FixedEmbedder),
            Arc::new(FixedIndex { results }),
            3,
        );

        let retrieved = engine.retrieve("anything").await.unwrap();
        assert_eq!(retrieved.len(), 3);
    }
}
