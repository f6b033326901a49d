//! Medrag - plain vs RAG comparison toolkit for medical guideline QA
//!
//! Medrag indexes a corpus of plain-text clinical guidelines into a local
//! vector store, answers questions against Groq-hosted chat models either
//! directly or grounded in retrieved guideline chunks, and runs the
//! side-by-side comparison that writes one CSV row per model, question,
//! and prompting mode.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic and domain models
//! - **Service Layer** (`services`): Ingestion, querying, and experiment runs
//! - **Infrastructure Layer** (`infrastructure`): Groq API, SQLite vector store,
//!   document loading, configuration
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use medrag::infrastructure::config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     println!("models: {:?}", config.models.all());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Chunk, ChunkingConfig, Config, Document, IndexMeta, QueryMode, ResultRecord, SearchResult,
};
pub use domain::ports::{ChatModel, EmbeddingService, VectorIndex};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ExperimentRunner, IngestService, QueryEngine};
