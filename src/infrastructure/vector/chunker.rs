//! Document chunking
//!
//! Splits guideline documents into overlapping windows for embedding.
//! Windows are measured in characters, never bytes, so multi-byte text
//! cannot be split inside a code point. Each chunk records the character
//! offset where it starts in the source document so retrieved passages
//! can be traced back to their origin.

use anyhow::Result;

use crate::domain::models::{Chunk, ChunkMetadata, ChunkingConfig};

/// Characters treated as sentence boundaries when snapping chunk ends
const SENTENCE_BOUNDARIES: [char; 4] = ['.', '!', '?', '\n'];

/// Splits document text into overlapping chunks
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker {
    /// Create a chunker with the default configuration
    pub fn new() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }

    /// Create a chunker with a custom configuration
    pub fn with_config(config: ChunkingConfig) -> Result<Self> {
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(Self { config })
    }

    /// The configuration this chunker was built with
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into overlapping chunks.
    ///
    /// Every chunk is at most `chunk_size` characters long, and each
    /// chunk after the first starts `chunk_overlap` characters before
    /// the previous chunk ends. When `respect_boundaries` is set, a
    /// chunk end is pulled back to the last sentence boundary inside
    /// the window, provided that still leaves room to advance past the
    /// overlap region.
    pub fn chunk(&self, text: &str, parent_id: &str, source_path: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut index = 0usize;

        while start < chars.len() {
            let hard_end = (start + size).min(chars.len());
            let mut end = hard_end;
            let mut snapped = false;

            // Only snap interior windows; the final window already ends
            // at the document boundary.
            if self.config.respect_boundaries && hard_end < chars.len() {
                if let Some(boundary) = last_boundary(&chars[start..hard_end]) {
                    let candidate = start + boundary + 1;
                    // The next window starts at end - overlap, so the
                    // snapped end must clear the overlap region or the
                    // scan would stop advancing.
                    if candidate > start + overlap {
                        end = candidate;
                        snapped = true;
                    }
                }
            }

            let content: String = chars[start..end].iter().collect();
            let mut metadata = ChunkMetadata::new(source_path.to_string(), start, end);
            if snapped {
                metadata = metadata.snapped();
            }

            chunks.push(Chunk::new(parent_id.to_string(), content, index).with_metadata(metadata));

            if end == chars.len() {
                break;
            }

            start = end - overlap;
            index += 1;
        }

        chunks
    }
}

/// Position of the last sentence boundary in `window`, if any
fn last_boundary(window: &[char]) -> Option<usize> {
    window
        .iter()
        .rposition(|c| SENTENCE_BOUNDARIES.contains(c))
}
