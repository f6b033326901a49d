//! Guideline document domain model

use serde::{Deserialize, Serialize};

/// A plain-text guideline document loaded from the corpus directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier derived from the file name
    pub id: String,

    /// Path the document was read from
    pub source_path: String,

    /// Full text content
    pub content: String,
}

impl Document {
    /// Create a document with an explicit identifier
    pub fn new(id: String, source_path: String, content: String) -> Self {
        Self {
            id,
            source_path,
            content,
        }
    }

    /// Length of the content in characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns true if the document has no content
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
