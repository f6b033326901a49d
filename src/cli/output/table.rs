//! Table output formatting for CLI commands
//!
//! Formatted table output for index status and experiment results using
//! comfy-table. Supports color-aware cells and automatic column sizing.

use std::env;
use std::path::Path;

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use crate::domain::models::{IndexMeta, ResultRecord};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    /// Create a formatter with colors forced on or off
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format the vector index status as a field/value table
    pub fn format_index_status(
        &self,
        index_dir: &Path,
        chunk_count: Option<u64>,
        meta: Option<&IndexMeta>,
    ) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Field").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("Index"),
            Cell::new(index_dir.display().to_string()),
        ]);

        match chunk_count {
            Some(count) => {
                let built_cell = if self.use_colors {
                    Cell::new("built").fg(Color::Green)
                } else {
                    Cell::new("built")
                };
                table.add_row(vec![Cell::new("State"), built_cell]);
                table.add_row(vec![Cell::new("Chunks"), Cell::new(count.to_string())]);
            }
            None => {
                let missing_cell = if self.use_colors {
                    Cell::new("missing").fg(Color::Red)
                } else {
                    Cell::new("missing")
                };
                table.add_row(vec![Cell::new("State"), missing_cell]);
            }
        }

        if let Some(meta) = meta {
            table.add_row(vec![
                Cell::new("Documents"),
                Cell::new(meta.document_count.to_string()),
            ]);
            table.add_row(vec![
                Cell::new("Embedding model"),
                Cell::new(&meta.embedding_model),
            ]);
            table.add_row(vec![
                Cell::new("Dimensions"),
                Cell::new(meta.dimensions.to_string()),
            ]);
            table.add_row(vec![
                Cell::new("Built at"),
                Cell::new(meta.built_at.to_rfc3339()),
            ]);
            table.add_row(vec![
                Cell::new("Run ID"),
                Cell::new(meta.run_id.to_string()),
            ]);
        }

        table.to_string()
    }

    /// Format experiment result rows as a table with truncated previews
    pub fn format_results(&self, records: &[ResultRecord]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Model").add_attribute(Attribute::Bold),
            Cell::new("Question").add_attribute(Attribute::Bold),
            Cell::new("Mode").add_attribute(Attribute::Bold),
            Cell::new("Response").add_attribute(Attribute::Bold),
        ]);

        for record in records {
            let mode_cell = if self.use_colors {
                Cell::new(record.mode.label()).fg(mode_color(record.mode.label()))
            } else {
                Cell::new(record.mode.label())
            };

            table.add_row(vec![
                Cell::new(&record.model),
                Cell::new(truncate_text(&record.question, 40)),
                mode_cell,
                Cell::new(truncate_text(&record.response, 60)),
            ]);
        }

        table.to_string()
    }

    /// Create a base table with common settings
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check for dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

/// Color for a prompting mode label
fn mode_color(label: &str) -> Color {
    if label == "RAG" {
        Color::Cyan
    } else {
        Color::White
    }
}

/// Truncate text to max length with ellipsis, never splitting a code point
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
