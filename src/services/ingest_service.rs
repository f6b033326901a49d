//! Corpus ingestion
//!
//! Rebuilds the vector index from the guideline corpus: load documents,
//! chunk them, embed every chunk, and persist the result. The build
//! happens in a staging directory that is renamed into place only after
//! it completes, so a failed rebuild leaves the previous index exactly
//! as it was and readers never observe a half-built index.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::models::{Document, IndexMeta};
use crate::domain::ports::{EmbeddingService, VectorIndex};
use crate::infrastructure::documents::DocumentLoader;
use crate::infrastructure::vector::{Chunker, SqliteVectorStore};

/// Summary of a completed index rebuild
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Identifier of this build run
    pub run_id: Uuid,

    /// Number of documents ingested
    pub document_count: usize,

    /// Number of chunks embedded and stored
    pub chunk_count: usize,

    /// Embedding model the index was built with
    pub embedding_model: String,

    /// Directory the finished index now lives in
    pub index_dir: PathBuf,
}

/// Builds the vector index from the guideline corpus
pub struct IngestService {
    loader: DocumentLoader,
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingService>,
}

impl IngestService {
    /// Create a new ingest service
    pub fn new(
        loader: DocumentLoader,
        chunker: Chunker,
        embedder: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            loader,
            chunker,
            embedder,
        }
    }

    /// Rebuild the index at `index_dir` from scratch.
    ///
    /// `on_document` is invoked after each document is embedded and
    /// stored, with the number of documents completed so far, the
    /// total, and the document id.
    pub async fn rebuild<F>(&self, index_dir: &Path, mut on_document: F) -> Result<IngestReport>
    where
        F: FnMut(usize, usize, &str),
    {
        let documents = self.loader.load_all()?;
        info!(
            documents = documents.len(),
            corpus = %self.loader.data_dir().display(),
            "loaded guideline corpus"
        );

        let staging = sibling_dir(index_dir, "staging")?;
        if staging.exists() {
            // Leftover from an interrupted run.
            fs::remove_dir_all(&staging)
                .with_context(|| format!("failed to clear stale staging at {}", staging.display()))?;
        }
        fs::create_dir_all(&staging)
            .with_context(|| format!("failed to create staging directory {}", staging.display()))?;

        let built = self
            .build_into(&staging, &documents, &mut on_document)
            .await;

        match built {
            Ok((meta, chunk_count)) => {
                swap_into_place(&staging, index_dir)?;
                info!(
                    chunks = chunk_count,
                    index = %index_dir.display(),
                    "index rebuild complete"
                );

                Ok(IngestReport {
                    run_id: meta.run_id,
                    document_count: documents.len(),
                    chunk_count,
                    embedding_model: meta.embedding_model,
                    index_dir: index_dir.to_path_buf(),
                })
            }
            Err(err) => {
                if let Err(cleanup) = fs::remove_dir_all(&staging) {
                    warn!(error = %cleanup, "failed to remove staging directory after build error");
                }
                Err(err)
            }
        }
    }

    /// Chunk, embed, and store every document into a store under `staging`
    async fn build_into<F>(
        &self,
        staging: &Path,
        documents: &[Document],
        on_document: &mut F,
    ) -> Result<(IndexMeta, usize)>
    where
        F: FnMut(usize, usize, &str),
    {
        let store = SqliteVectorStore::create(&SqliteVectorStore::db_path(staging)).await?;

        let mut chunk_count = 0usize;
        for (position, document) in documents.iter().enumerate() {
            let chunks = self
                .chunker
                .chunk(&document.content, &document.id, &document.source_path);

            if chunks.is_empty() {
                warn!(document = %document.id, "document produced no chunks");
            } else {
                let texts: Vec<String> =
                    chunks.iter().map(|chunk| chunk.content.clone()).collect();
                let embeddings = self
                    .embedder
                    .embed_batch(&texts)
                    .await
                    .with_context(|| format!("failed to embed document {}", document.id))?;

                chunk_count += store.insert_chunks(&chunks, &embeddings).await?;
            }

            debug!(
                document = %document.id,
                chunks = chunks.len(),
                "document embedded"
            );
            on_document(position + 1, documents.len(), &document.id);
        }

        let meta = IndexMeta::new(
            self.embedder.model_name().to_string(),
            self.embedder.dimensions(),
            documents.len() as u64,
        );
        store.write_meta(&meta).await?;
        store.close().await;

        Ok((meta, chunk_count))
    }
}

/// Hidden sibling of `index_dir` used for staging and displaced indexes
fn sibling_dir(index_dir: &Path, suffix: &str) -> Result<PathBuf> {
    let name = index_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            anyhow!(
                "index directory has no usable name: {}",
                index_dir.display()
            )
        })?;
    let parent = index_dir.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(format!(".{name}.{suffix}")))
}

/// Replace `index_dir` with the finished build in `staging`.
///
/// The previous index is moved aside first and restored if the final
/// rename fails, so every failure mode leaves a complete index behind.
fn swap_into_place(staging: &Path, index_dir: &Path) -> Result<()> {
    let displaced = sibling_dir(index_dir, "old")?;

    if displaced.exists() {
        fs::remove_dir_all(&displaced).with_context(|| {
            format!("failed to clear displaced index at {}", displaced.display())
        })?;
    }

    let had_previous = index_dir.exists();
    if had_previous {
        fs::rename(index_dir, &displaced).with_context(|| {
            format!("failed to move previous index aside to {}", displaced.display())
        })?;
    }

    if let Err(err) = fs::rename(staging, index_dir) {
        if had_previous {
            let _ = fs::rename(&displaced, index_dir);
        }
        return Err(err).with_context(|| {
            format!("failed to move new index into place at {}", index_dir.display())
        });
    }

    if had_previous {
        if let Err(err) = fs::remove_dir_all(&displaced) {
            warn!(error = %err, "failed to remove displaced index");
        }
    }

    Ok(())
}
