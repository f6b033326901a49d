//! Domain model definitions

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod experiment;
pub mod index_meta;

pub use chunking::{Chunk, ChunkMetadata, ChunkingConfig};
pub use config::{
    ApiConfig, Config, EmbeddingConfig, LoggingConfig, ModelsConfig, PathsConfig, RateLimitConfig,
    RetrievalConfig, RetryConfig,
};
pub use document::Document;
pub use embedding::{EmbeddingModel, SearchResult};
pub use experiment::{QueryMode, ResultRecord};
pub use index_meta::IndexMeta;
