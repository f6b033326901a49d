//! Experiment driver
//!
//! Runs the plain-vs-RAG comparison: every configured model answers
//! every question in both modes, and the responses land in one flat
//! table. Rows are appended in a fixed order (per model, per question,
//! Plain then RAG) so runs over the same inputs produce comparable
//! files. A failed completion aborts the run once the chat client's
//! retry budget is spent; there is no skip-and-continue.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::domain::models::{QueryMode, ResultRecord};
use crate::services::query_engine::QueryEngine;

/// Number of characters of a question shown in progress output
const QUESTION_PREVIEW_CHARS: usize = 50;

/// Drives the plain-vs-RAG comparison across models and questions
pub struct ExperimentRunner {
    engine: Arc<QueryEngine>,
    models: Vec<String>,
}

impl ExperimentRunner {
    /// Create a runner comparing `models` through `engine`
    pub fn new(engine: Arc<QueryEngine>, models: Vec<String>) -> Self {
        Self { engine, models }
    }

    /// The models under comparison, in run order
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Number of result rows a run over `questions` will produce
    pub fn total_rows(&self, questions: &[String]) -> usize {
        self.models.len() * questions.len() * QueryMode::ALL.len()
    }

    /// Read the question file, skipping blank lines
    pub fn read_questions(path: &Path) -> Result<Vec<String>> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read question file {}", path.display()))?;

        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    /// Run every model over every question in both modes.
    ///
    /// `on_record` is invoked as each row is produced, in output order.
    pub async fn run<F>(&self, questions: &[String], mut on_record: F) -> Result<Vec<ResultRecord>>
    where
        F: FnMut(&ResultRecord),
    {
        let mut records = Vec::with_capacity(self.total_rows(questions));

        for model in &self.models {
            info!(model = %model, "testing model");

            for question in questions {
                debug!(
                    model = %model,
                    question = %question_preview(question),
                    "running question"
                );

                let plain = self.engine.plain_answer(model, question).await?;
                let record =
                    ResultRecord::new(model.clone(), question.clone(), QueryMode::Plain, plain);
                on_record(&record);
                records.push(record);

                let grounded = self.engine.grounded_answer(model, question).await?;
                let record = ResultRecord::new(
                    model.clone(),
                    question.clone(),
                    QueryMode::Rag,
                    grounded.answer,
                );
                on_record(&record);
                records.push(record);
            }
        }

        info!(rows = records.len(), "experiment run complete");
        Ok(records)
    }

    /// Write result rows as CSV.
    ///
    /// The header row is written even when there are no records, so a
    /// run over an empty question file still produces a well-formed
    /// table. Free-text responses are quoted by the writer as needed.
    pub fn write_csv(path: &Path, records: &[ResultRecord]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory {}", parent.display())
                })?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;

        writer.write_record(["Model", "Question", "Mode", "Response"])?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// Truncated question text for progress display
pub fn question_preview(question: &str) -> String {
    let head: String = question.chars().take(QUESTION_PREVIEW_CHARS).collect();
    format!("{head}...")
}
