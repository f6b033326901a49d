//! Text chunking domain models
//!
//! Models for splitting guideline documents into overlapping chunks
//! for embedding. Sizes and offsets are measured in characters so that
//! multi-byte text never splits inside a code point.

use serde::{Deserialize, Serialize};

/// Configuration for document chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Whether to pull chunk ends back to sentence boundaries
    #[serde(default = "default_respect_boundaries")]
    pub respect_boundaries: bool,
}

const fn default_chunk_size() -> usize {
    512
}

const fn default_chunk_overlap() -> usize {
    50
}

const fn default_respect_boundaries() -> bool {
    true
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            respect_boundaries: default_respect_boundaries(),
        }
    }
}

impl ChunkingConfig {
    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be less than chunk_size".to_string());
        }

        Ok(())
    }
}

/// A chunk of text extracted from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: String,

    /// ID of the parent document
    pub parent_id: String,

    /// The text content of this chunk
    pub content: String,

    /// Index of this chunk within the parent document (0-based)
    pub chunk_index: usize,

    /// Metadata about this chunk
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(parent_id: String, content: String, chunk_index: usize) -> Self {
        let id = format!("{parent_id}:chunk:{chunk_index}");

        Self {
            id,
            parent_id,
            content,
            chunk_index,
            metadata: ChunkMetadata::default(),
        }
    }

    /// Set metadata for this chunk
    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Length of the content in characters
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns true if this is the first chunk of its document
    pub fn is_first(&self) -> bool {
        self.chunk_index == 0
    }

    /// Get a preview of the content (first 100 characters)
    pub fn preview(&self) -> String {
        if self.char_count() <= 100 {
            self.content.clone()
        } else {
            let head: String = self.content.chars().take(100).collect();
            format!("{head}...")
        }
    }
}

/// Metadata about a chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Path of the source document
    pub source_path: String,

    /// Start position in the original document (character offset)
    pub start_offset: usize,

    /// End position in the original document (character offset, exclusive)
    pub end_offset: usize,

    /// Whether the chunk end was pulled back to a sentence boundary
    pub snapped_to_boundary: bool,
}

impl ChunkMetadata {
    /// Create metadata for a span of the source document
    pub fn new(source_path: String, start_offset: usize, end_offset: usize) -> Self {
        Self {
            source_path,
            start_offset,
            end_offset,
            snapped_to_boundary: false,
        }
    }

    /// Mark the chunk as snapped to a sentence boundary
    pub fn snapped(mut self) -> Self {
        self.snapped_to_boundary = true;
        self
    }
}
