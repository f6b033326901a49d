//! SQLite-backed vector store
//!
//! Persists chunks and their embeddings in a single SQLite file and
//! answers similarity queries with a pure-Rust cosine scan. The corpus
//! is small enough that a full scan stays well inside interactive
//! latency, and it keeps the store free of native extensions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::models::{Chunk, IndexMeta, SearchResult};
use crate::domain::ports::VectorIndex;

/// File name of the index database inside the index directory
const INDEX_DB_FILE: &str = "index.db";

/// SQLite-backed chunk index
#[derive(Debug)]
pub struct SqliteVectorStore {
    pool: SqlitePool,
}

impl SqliteVectorStore {
    /// Path of the index database inside `index_dir`
    pub fn db_path(index_dir: &Path) -> PathBuf {
        index_dir.join(INDEX_DB_FILE)
    }

    /// Create a new store at `db_path`, creating the file and schema.
    ///
    /// Safe to call on an existing database; the schema is idempotent.
    pub async fn create(db_path: &Path) -> Result<Self> {
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .with_context(|| format!("failed to create index database at {}", db_path.display()))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                source_path TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                start_offset INTEGER NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL
            )
            ",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS index_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            ",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Open an existing store read-only.
    ///
    /// Fails with a pointer to `ingest` when no index has been built.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            return Err(anyhow!(
                "no index found at {} (run `medrag ingest` first)",
                db_path.display()
            ));
        }

        let url = format!("sqlite://{}?mode=ro", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .with_context(|| format!("failed to open index database at {}", db_path.display()))?;

        Ok(Self { pool })
    }

    /// Record how this index was built
    pub async fn write_meta(&self, meta: &IndexMeta) -> Result<()> {
        let entries = [
            ("run_id", meta.run_id.to_string()),
            ("embedding_model", meta.embedding_model.clone()),
            ("dimensions", meta.dimensions.to_string()),
            ("document_count", meta.document_count.to_string()),
            ("built_at", meta.built_at.to_rfc3339()),
        ];

        for (key, value) in entries {
            sqlx::query("INSERT OR REPLACE INTO index_meta (key, value) VALUES (?1, ?2)")
                .bind(key)
                .bind(value)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    /// Read the build metadata, if the index carries any
    pub async fn read_meta(&self) -> Result<Option<IndexMeta>> {
        let rows = sqlx::query("SELECT key, value FROM index_meta")
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut entries = HashMap::new();
        for row in rows {
            let key: String = row.try_get("key")?;
            let value: String = row.try_get("value")?;
            entries.insert(key, value);
        }

        let get = |key: &str| {
            entries
                .get(key)
                .cloned()
                .ok_or_else(|| anyhow!("index metadata is missing '{key}'"))
        };

        let run_id = Uuid::parse_str(&get("run_id")?).context("invalid run_id in index metadata")?;
        let dimensions: usize = get("dimensions")?
            .parse()
            .context("invalid dimensions in index metadata")?;
        let document_count: u64 = get("document_count")?
            .parse()
            .context("invalid document_count in index metadata")?;
        let built_at = DateTime::parse_from_rfc3339(&get("built_at")?)
            .context("invalid built_at in index metadata")?
            .with_timezone(&Utc);

        Ok(Some(IndexMeta {
            run_id,
            embedding_model: get("embedding_model")?,
            dimensions,
            document_count,
            built_at,
        }))
    }

    /// Close the underlying connection pool.
    ///
    /// Must happen before the index directory is renamed so no open
    /// handles point at the old path.
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Serialize an embedding to little-endian bytes for storage
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize an embedding from stored bytes
    fn bytes_to_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return Err(anyhow!("invalid embedding bytes length"));
        }

        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Cosine distance between two vectors.
    ///
    /// Mismatched lengths and zero-magnitude vectors rank last rather
    /// than erroring, so one malformed row cannot poison a search.
    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return f32::MAX;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if mag_a == 0.0 || mag_b == 0.0 {
            return f32::MAX;
        }

        1.0 - (dot / (mag_a * mag_b))
    }
}

#[async_trait]
impl VectorIndex for SqliteVectorStore {
    async fn insert_chunks(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<usize> {
        if chunks.len() != embeddings.len() {
            return Err(anyhow!(
                "chunk/embedding count mismatch: {} chunks, {} embeddings",
                chunks.len(),
                embeddings.len()
            ));
        }

        let mut tx = self.pool.begin().await?;

        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            sqlx::query(
                r"
                INSERT INTO chunks (id, source_path, chunk_index, start_offset, content, embedding)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(&chunk.id)
            .bind(&chunk.metadata.source_path)
            .bind(i64::try_from(chunk.chunk_index).unwrap_or(i64::MAX))
            .bind(i64::try_from(chunk.metadata.start_offset).unwrap_or(i64::MAX))
            .bind(&chunk.content)
            .bind(Self::embedding_to_bytes(embedding))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to insert chunk {}", chunk.id))?;
        }

        tx.commit().await?;

        Ok(chunks.len())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let rows = sqlx::query(
            "SELECT id, source_path, chunk_index, start_offset, content, embedding FROM chunks",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());

        for row in rows {
            let chunk_id: String = row.try_get("id")?;
            let source_path: String = row.try_get("source_path")?;
            let chunk_index: i64 = row.try_get("chunk_index")?;
            let start_offset: i64 = row.try_get("start_offset")?;
            let content: String = row.try_get("content")?;
            let bytes: Vec<u8> = row.try_get("embedding")?;

            let embedding = Self::bytes_to_embedding(&bytes)
                .with_context(|| format!("corrupt embedding for chunk {chunk_id}"))?;
            let distance = Self::cosine_distance(query, &embedding);

            results.push(SearchResult::new(
                chunk_id,
                source_path,
                usize::try_from(chunk_index).unwrap_or(0),
                usize::try_from(start_offset).unwrap_or(0),
                content,
                distance,
            ));
        }

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    async fn chunk_count(&self) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
