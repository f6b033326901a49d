//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Groq chat API client
//! - Document corpus loading
//! - Embedding generation and SQLite vector storage
//! - Configuration management
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod documents;
pub mod groq;
pub mod vector;
