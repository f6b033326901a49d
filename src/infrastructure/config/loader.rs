//! Configuration loading
//!
//! Resolves the runtime configuration by layering defaults, an optional
//! YAML file, and environment variables. The flat variable names from
//! the original research scripts (GROQ_API_KEY, MODEL_A, ...) are kept
//! working so existing .env files keep their meaning.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Config file consulted when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "medrag.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration using the default file location.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. medrag.yaml in the working directory, when present
    /// 3. MEDRAG_* environment variables (nested via `__`)
    /// 4. The flat legacy names (GROQ_API_KEY, TEMPERATURE, ...)
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_with_file(None)
    }

    /// Load configuration, reading `config_file` instead of the default
    /// location when one is given. An explicit file must exist; the
    /// default location is optional.
    pub fn load_with_file(config_file: Option<&Path>) -> Result<Config, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        figment = match config_file {
            Some(path) => figment.merge(Yaml::file_exact(path)),
            None => figment.merge(Yaml::file(DEFAULT_CONFIG_FILE)),
        };

        let config: Config = figment
            .merge(Env::prefixed("MEDRAG_").split("__"))
            .merge(Self::flat_env())
            .extract()
            .map_err(Box::new)?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Provider for the flat environment names the research scripts used
    fn flat_env() -> Env {
        Env::raw()
            .only(&[
                "GROQ_API_KEY",
                "TEMPERATURE",
                "EMBEDDING_MODEL",
                "CHUNK_SIZE",
                "CHUNK_OVERLAP",
                "MODEL_A",
                "MODEL_B",
            ])
            .map(|key| {
                let upper = key.as_str().to_ascii_uppercase();
                match upper.as_str() {
                    "GROQ_API_KEY" => "api.key".into(),
                    "TEMPERATURE" => "api.temperature".into(),
                    "EMBEDDING_MODEL" => "embedding.model_name".into(),
                    "CHUNK_SIZE" => "chunking.chunk_size".into(),
                    "CHUNK_OVERLAP" => "chunking.chunk_overlap".into(),
                    "MODEL_A" => "models.model_a".into(),
                    "MODEL_B" => "models.model_b".into(),
                    _ => upper.into(),
                }
            })
            .split(".")
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        config.validate().map_err(ConfigError::ValidationFailed)
    }
}
