//! Implementation of the `medrag ask` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::warn;

use crate::cli::output::{output, progress, CommandOutput};
use crate::domain::models::{Config, QueryMode, SearchResult};
use crate::infrastructure::groq::GroqClient;
use crate::infrastructure::vector::{LocalEmbeddingService, SqliteVectorStore};
use crate::services::QueryEngine;

/// Arguments for asking a single question
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to ask
    pub question: String,

    /// Answer without retrieved guideline context
    #[arg(long)]
    pub plain: bool,

    /// Model to query (defaults to the first configured model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Print the retrieved chunks alongside the answer
    #[arg(long)]
    pub show_context: bool,

    /// Directory the vector index is read from
    #[arg(long, value_name = "DIR")]
    pub index_dir: Option<PathBuf>,
}

/// One retrieved chunk as shown to the user
#[derive(Debug, serde::Serialize)]
pub struct SourceOutput {
    /// Source document path
    pub source: String,

    /// Position of the chunk within its document
    pub chunk_index: usize,

    /// Similarity score in (0, 1], higher is closer
    pub score: f32,

    /// Chunk text
    pub content: String,
}

impl From<&SearchResult> for SourceOutput {
    fn from(result: &SearchResult) -> Self {
        Self {
            source: result.source_path.clone(),
            chunk_index: result.chunk_index,
            score: result.score,
            content: result.content.clone(),
        }
    }
}

/// Result payload of a single question
#[derive(Debug, serde::Serialize)]
pub struct AskOutput {
    /// Question as asked
    pub question: String,

    /// Model that produced the answer
    pub model: String,

    /// Prompting mode used
    pub mode: QueryMode,

    /// Answer text
    pub answer: String,

    /// Retrieved chunks, populated only when requested
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceOutput>,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("[{} · {}]", self.model, self.mode), String::new()];
        lines.push(self.answer.clone());

        if !self.sources.is_empty() {
            lines.push(String::new());
            lines.push("Sources:".to_string());
            for (position, source) in self.sources.iter().enumerate() {
                lines.push(format!(
                    "  [{}] {} (chunk {}, score {:.3})",
                    position + 1,
                    source.source,
                    source.chunk_index,
                    source.score
                ));
            }
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Answer one question, grounded in the index unless `--plain` is given.
pub async fn execute(args: AskArgs, config: &Config, json_mode: bool) -> Result<()> {
    let index_dir = args
        .index_dir
        .unwrap_or_else(|| config.paths.index_dir.clone());
    let model = args
        .model
        .unwrap_or_else(|| config.models.model_a.clone());

    let chat = Arc::new(GroqClient::from_config(
        &config.api,
        &config.rate_limit,
        &config.retry,
    )?);
    let embedder = Arc::new(LocalEmbeddingService::from_name(&config.embedding.model_name));

    let store = SqliteVectorStore::open(&SqliteVectorStore::db_path(&index_dir)).await?;
    if let Some(meta) = store.read_meta().await? {
        if !meta.matches_model(&config.embedding.model_name) {
            warn!(
                index_model = %meta.embedding_model,
                configured_model = %config.embedding.model_name,
                "index was built with a different embedding model, rerun `medrag ingest`"
            );
        }
    }

    let engine = QueryEngine::new(chat, embedder, Arc::new(store), config.retrieval.top_k);

    let spinner = progress::create_spinner_with_message(format!("querying {model}"));
    let result = answer(&engine, &model, &args.question, args.plain, args.show_context).await;
    spinner.finish_and_clear();

    let output_data = result?;
    output(&output_data, json_mode);
    Ok(())
}

async fn answer(
    engine: &QueryEngine,
    model: &str,
    question: &str,
    plain: bool,
    show_context: bool,
) -> Result<AskOutput> {
    if plain {
        let answer = engine.plain_answer(model, question).await?;
        return Ok(AskOutput {
            question: question.to_string(),
            model: model.to_string(),
            mode: QueryMode::Plain,
            answer,
            sources: Vec::new(),
        });
    }

    let grounded = engine.grounded_answer(model, question).await?;
    let sources = if show_context {
        grounded.sources.iter().map(SourceOutput::from).collect()
    } else {
        Vec::new()
    };

    Ok(AskOutput {
        question: question.to_string(),
        model: model.to_string(),
        mode: QueryMode::Rag,
        answer: grounded.answer,
        sources,
    })
}
