//! CLI command implementations.

pub mod ask;
pub mod experiment;
pub mod ingest;
pub mod status;
