//! Implementation of the `medrag status` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, IndexMeta};
use crate::domain::ports::VectorIndex;
use crate::infrastructure::vector::SqliteVectorStore;

/// Arguments for inspecting the vector index
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directory the vector index is read from
    #[arg(long, value_name = "DIR")]
    pub index_dir: Option<PathBuf>,
}

/// Current state of the vector index
#[derive(Debug, serde::Serialize)]
pub struct StatusOutput {
    /// Directory the index lives in
    pub index_dir: PathBuf,

    /// Whether a built index exists
    pub built: bool,

    /// Number of stored chunks, when the index exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<u64>,

    /// Build metadata, when the index records it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<IndexMeta>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let mut rendered = TableFormatter::new().format_index_status(
            &self.index_dir,
            self.chunks,
            self.meta.as_ref(),
        );
        if !self.built {
            rendered.push_str("\nRun `medrag ingest` to build the index.");
        }
        rendered
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Report whether an index exists and what it was built from.
pub async fn execute(args: StatusArgs, config: &Config, json_mode: bool) -> Result<()> {
    let index_dir = args
        .index_dir
        .unwrap_or_else(|| config.paths.index_dir.clone());
    let db_path = SqliteVectorStore::db_path(&index_dir);

    let output_data = if db_path.exists() {
        let store = SqliteVectorStore::open(&db_path).await?;
        let chunks = store.chunk_count().await?;
        let meta = store.read_meta().await?;
        store.close().await;

        StatusOutput {
            index_dir,
            built: true,
            chunks: Some(chunks),
            meta,
        }
    } else {
        StatusOutput {
            index_dir,
            built: false,
            chunks: None,
            meta: None,
        }
    };

    output(&output_data, json_mode);
    Ok(())
}
