//! Document corpus infrastructure

pub mod loader;

pub use loader::DocumentLoader;
