//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::ask::AskArgs;
use crate::cli::commands::experiment::ExperimentArgs;
use crate::cli::commands::ingest::IngestArgs;
use crate::cli::commands::status::StatusArgs;

/// Top-level CLI options
#[derive(Parser)]
#[command(name = "medrag")]
#[command(about = "Medrag - plain vs RAG comparison for medical guideline QA", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the vector index from the guideline corpus
    Ingest(IngestArgs),

    /// Ask a single question against the index
    Ask(AskArgs),

    /// Run the plain-vs-RAG comparison across configured models
    Experiment(ExperimentArgs),

    /// Show vector index status
    Status(StatusArgs),
}
