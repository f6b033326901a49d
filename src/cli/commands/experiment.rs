//! Implementation of the `medrag experiment` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::warn;

use crate::cli::output::{output, progress, CommandOutput, ProgressBarExt, TableFormatter};
use crate::domain::models::{Config, ResultRecord};
use crate::infrastructure::groq::GroqClient;
use crate::infrastructure::vector::{LocalEmbeddingService, SqliteVectorStore};
use crate::services::{question_preview, ExperimentRunner, QueryEngine};

/// Arguments for the plain-vs-RAG comparison run
#[derive(Args, Debug)]
pub struct ExperimentArgs {
    /// Path to the question list, one question per line
    #[arg(short, long, value_name = "FILE")]
    pub questions: Option<PathBuf>,

    /// Path the CSV results are written to
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory the vector index is read from
    #[arg(long, value_name = "DIR")]
    pub index_dir: Option<PathBuf>,
}

/// Result payload of a comparison run
#[derive(Debug, serde::Serialize)]
pub struct ExperimentOutput {
    /// Models that were evaluated
    pub models: Vec<String>,

    /// Number of questions read from the question file
    pub question_count: usize,

    /// Number of result rows produced
    pub row_count: usize,

    /// File the results were written to
    pub output_file: PathBuf,

    /// All result rows
    pub records: Vec<ResultRecord>,
}

impl CommandOutput for ExperimentOutput {
    fn to_human(&self) -> String {
        let table = TableFormatter::new().format_results(&self.records);
        format!(
            "{}\n\nEvaluated {} model(s) on {} question(s), {} row(s) written to {}.",
            table,
            self.models.len(),
            self.question_count,
            self.row_count,
            self.output_file.display()
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run every configured model over the question list in both modes and
/// write the results as CSV.
pub async fn execute(args: ExperimentArgs, config: &Config, json_mode: bool) -> Result<()> {
    let questions_file = args
        .questions
        .unwrap_or_else(|| config.paths.questions_file.clone());
    let output_file = args
        .output
        .unwrap_or_else(|| config.paths.output_file.clone());
    let index_dir = args
        .index_dir
        .unwrap_or_else(|| config.paths.index_dir.clone());

    let questions = ExperimentRunner::read_questions(&questions_file)?;

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

    let engine = Arc::new(QueryEngine::new(
        chat,
        embedder,
        Arc::new(store),
        config.retrieval.top_k,
    ));
    let runner = ExperimentRunner::new(engine, config.models.all());

    let pb = progress::create_progress_bar(runner.total_rows(&questions) as u64);
    let result = runner
        .run(&questions, |record| {
            pb.inc(1);
            pb.set_message(format!(
                "{} · {} · {}",
                record.model,
                record.mode,
                question_preview(&record.question)
            ));
        })
        .await;

    let records = match result {
        Ok(records) => {
            pb.finish_success("experiment complete");
            records
        }
        Err(err) => {
            pb.finish_error("experiment aborted");
            return Err(err);
        }
    };

    ExperimentRunner::write_csv(&output_file, &records)?;

    let output_data = ExperimentOutput {
        models: runner.models().to_vec(),
        question_count: questions.len(),
        row_count: records.len(),
        output_file,
        records,
    };
    output(&output_data, json_mode);
    Ok(())
}
