//! Main configuration structures
//!
//! Every section carries serde defaults so a missing config file, a
//! partial file, and environment overrides all resolve to a complete
//! configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::chunking::ChunkingConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Groq API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Models compared by the experiment driver
    #[serde(default)]
    pub models: ModelsConfig,

    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Document chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Filesystem layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            models: ModelsConfig::default(),
            embedding: EmbeddingConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            paths: PathsConfig::default(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Validate the resolved configuration
    pub fn validate(&self) -> Result<(), String> {
        self.chunking.validate()?;

        if self.api.base_url.trim().is_empty() {
            return Err("api.base_url must not be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.api.temperature) {
            return Err("api.temperature must be between 0.0 and 2.0".to_string());
        }

        if self.api.max_tokens == 0 {
            return Err("api.max_tokens must be greater than 0".to_string());
        }

        if let Some(key) = &self.api.key {
            if key.trim().is_empty() {
                return Err("api.key must not be empty when set".to_string());
            }
        }

        if self.models.model_a.trim().is_empty() || self.models.model_b.trim().is_empty() {
            return Err("models.model_a and models.model_b must not be empty".to_string());
        }

        if self.embedding.model_name.trim().is_empty() {
            return Err("embedding.model_name must not be empty".to_string());
        }

        if self.retrieval.top_k == 0 {
            return Err("retrieval.top_k must be greater than 0".to_string());
        }

        if self.rate_limit.requests_per_second <= 0.0 {
            return Err("rate_limit.requests_per_second must be positive".to_string());
        }

        if self.retry.max_backoff_ms < self.retry.initial_backoff_ms {
            return Err("retry.max_backoff_ms must be at least initial_backoff_ms".to_string());
        }

        Ok(())
    }
}

/// Groq API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiConfig {
    /// API key (usually supplied via the GROQ_API_KEY environment variable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Base URL of the OpenAI-compatible chat endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens to generate per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

const fn default_temperature() -> f64 {
    0.0
}

const fn default_max_tokens() -> u32 {
    1024
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Models compared by the experiment driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelsConfig {
    /// First model under comparison
    #[serde(default = "default_model_a")]
    pub model_a: String,

    /// Second model under comparison
    #[serde(default = "default_model_b")]
    pub model_b: String,
}

fn default_model_a() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_model_b() -> String {
    "llama-3.3-70b-versatile".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            model_a: default_model_a(),
            model_b: default_model_b(),
        }
    }
}

impl ModelsConfig {
    /// Both models in evaluation order
    pub fn all(&self) -> Vec<String> {
        vec![self.model_a.clone(), self.model_b.clone()]
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Embedding model name, resolved to a supported family at startup
    #[serde(default = "default_embedding_model")]
    pub model_name: String,
}

fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_embedding_model(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per grounded query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

const fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Filesystem layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PathsConfig {
    /// Directory holding the plain-text guideline corpus
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding the persisted vector index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Question file, one question per line
    #[serde(default = "default_questions_file")]
    pub questions_file: PathBuf,

    /// Evaluation table written by the experiment driver
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/medical_guidelines/WHO")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("rag/index")
}

fn default_questions_file() -> PathBuf {
    PathBuf::from("experiments/questions.txt")
}

fn default_output_file() -> PathBuf {
    PathBuf::from("experiments/evaluation.csv")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_dir: default_index_dir(),
            questions_file: default_questions_file(),
            output_file: default_output_file(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed against the chat endpoint
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Burst size for the token bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

const fn default_requests_per_second() -> f64 {
    2.0
}

const fn default_burst_size() -> u32 {
    4
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.api.temperature, 0.0);
        assert_eq!(config.chunking.chunk_size, 512);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.models.model_a, "llama-3.1-8b-instant");
        assert_eq!(config.models.model_b, "llama-3.3-70b-versatile");
        assert_eq!(
            config.paths.data_dir,
            PathBuf::from("data/medical_guidelines/WHO")
        );
        assert_eq!(config.paths.output_file, PathBuf::from("experiments/evaluation.csv"));
    }

    #[test]
    fn test_config_default_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_overlap() {
        let mut config = Config::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = Config::default();
        config.api.temperature = 2.5;
        assert!(config.validate().is_err());

        config.api.temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nonpositive_rate() {
        let mut config = Config::default();
        config.rate_limit.requests_per_second = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = Config::default();
        config.models.model_b = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        let mut config = Config::default();
        config.api.key = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.api.key = Some("gsk_test_key_value".to_string());
        assert!(config.validate().is_ok());
    }
}
