//! Port trait definitions
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - `ChatModel`: chat completion against an OpenAI-compatible API
//! - `EmbeddingService`: text to vector conversion
//! - `VectorIndex`: persisted chunk storage and similarity search
//!
//! These traits keep the services layer independent of specific
//! infrastructure implementations.

pub mod chat;
pub mod embedding;
pub mod index;

pub use chat::ChatModel;
pub use embedding::EmbeddingService;
pub use index::VectorIndex;
