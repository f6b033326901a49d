//! Groq API client infrastructure

pub mod client;
pub mod error;
pub mod rate_limiter;
pub mod retry;
pub mod types;

pub use client::GroqClient;
pub use error::GroqApiError;
pub use rate_limiter::TokenBucketRateLimiter;
pub use retry::RetryPolicy;
pub use types::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, TokenUsage};
