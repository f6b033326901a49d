//! Domain layer
//!
//! Core models and port traits for the guideline question answering
//! pipeline. No I/O happens here.

pub mod models;
pub mod ports;
