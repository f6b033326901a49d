//! Service layer
//!
//! High-level orchestration over the domain ports: corpus ingestion,
//! question answering, and the plain-vs-RAG comparison run.

pub mod experiment_runner;
pub mod ingest_service;
pub mod query_engine;

pub use experiment_runner::{question_preview, ExperimentRunner};
pub use ingest_service::{IngestReport, IngestService};
pub use query_engine::{GroundedAnswer, QueryEngine};
