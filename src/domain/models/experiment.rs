//! Experiment domain models
//!
//! Models for the plain-vs-RAG comparison run: which prompting mode a
//! response used and the flat result rows written to the evaluation table.

use serde::{Deserialize, Serialize};

/// Prompting mode used to produce a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryMode {
    /// Direct model answer without retrieved context
    Plain,

    /// Answer grounded in retrieved guideline chunks
    #[serde(rename = "RAG")]
    Rag,
}

impl QueryMode {
    /// All modes in evaluation order
    pub const ALL: [Self; 2] = [Self::Plain, Self::Rag];

    /// Human-readable label used in result tables
    pub fn label(&self) -> &'static str {
        match self {
            Self::Plain => "Plain",
            Self::Rag => "RAG",
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the evaluation table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultRecord {
    /// Model identifier that produced the response
    pub model: String,

    /// Question as read from the question file
    pub question: String,

    /// Prompting mode
    pub mode: QueryMode,

    /// Full response text
    pub response: String,
}

impl ResultRecord {
    /// Create a result row
    pub fn new(model: String, question: String, mode: QueryMode, response: String) -> Self {
        Self {
            model,
            question,
            mode,
            response,
        }
    }
}
