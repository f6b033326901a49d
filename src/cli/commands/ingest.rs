//! Implementation of the `medrag ingest` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, progress, CommandOutput, ProgressBarExt};
use crate::domain::models::Config;
use crate::infrastructure::documents::DocumentLoader;
use crate::infrastructure::vector::{Chunker, LocalEmbeddingService};
use crate::services::IngestService;

/// Arguments for rebuilding the vector index
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory containing the .txt guideline corpus
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory the vector index is written to
    #[arg(long, value_name = "DIR")]
    pub index_dir: Option<PathBuf>,
}

/// Result payload of an index rebuild
#[derive(Debug, serde::Serialize)]
pub struct IngestOutput {
    /// Identifier of this build run
    pub run_id: String,

    /// Number of documents ingested
    pub documents: usize,

    /// Number of chunks embedded and stored
    pub chunks: usize,

    /// Embedding model the index was built with
    pub embedding_model: String,

    /// Directory the finished index lives in
    pub index_dir: PathBuf,
}

impl CommandOutput for IngestOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Indexed {} document(s) into {} chunk(s).",
            self.documents, self.chunks
        )];
        lines.push(format!("Embedding model: {}", self.embedding_model));
        lines.push(format!("Index: {}", self.index_dir.display()));
        lines.push(format!("Run ID: {}", self.run_id));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Rebuild the vector index from the guideline corpus.
pub async fn execute(args: IngestArgs, config: &Config, json_mode: bool) -> Result<()> {
    let data_dir = args.data_dir.unwrap_or_else(|| config.paths.data_dir.clone());
    let index_dir = args
        .index_dir
        .unwrap_or_else(|| config.paths.index_dir.clone());

    let loader = DocumentLoader::new(&data_dir);
    let chunker = Chunker::with_config(config.chunking.clone())?;
    let embedder = Arc::new(LocalEmbeddingService::from_name(&config.embedding.model_name));

    let service = IngestService::new(loader, chunker, embedder);

    // The document count is unknown until the corpus is loaded, so the
    // bar starts empty and is sized on the first callback.
    let pb = progress::create_progress_bar(0);
    let report = service
        .rebuild(&index_dir, |done, total, id| {
            if pb.length() == Some(0) {
                pb.set_length(total as u64);
            }
            ProgressBarExt::update(&pb, done as u64, format!("embedding {id}"));
        })
        .await;

    match report {
        Ok(report) => {
            pb.finish_success("index built");
            let output_data = IngestOutput {
                run_id: report.run_id.to_string(),
                documents: report.document_count,
                chunks: report.chunk_count,
                embedding_model: report.embedding_model,
                index_dir: report.index_dir,
            };
            output(&output_data, json_mode);
            Ok(())
        }
        Err(err) => {
            pb.finish_error("index rebuild failed");
            Err(err)
        }
    }
}
