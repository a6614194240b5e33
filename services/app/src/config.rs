//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Where the local database lives. Created on first launch.
    pub database_path: PathBuf,
    pub log_level: Level,
    /// Optional at load time; quiz generation is disabled without it.
    pub openai_api_key: Option<String>,
    pub quiz_model: String,
    pub questions_per_quiz: usize,
    /// Page text beyond this many characters is truncated before it is
    /// sent to the generator.
    pub max_context_chars: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let database_path = std::env::var("STUDYDESK_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./studydesk.db"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let quiz_model =
            std::env::var("QUIZ_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let questions_per_quiz = parse_count_var("QUESTIONS_PER_QUIZ", 5)?;
        let max_context_chars = parse_count_var("MAX_CONTEXT_CHARS", 15_000)?;

        Ok(Self {
            database_path,
            log_level,
            openai_api_key,
            quiz_model,
            questions_per_quiz,
            max_context_chars,
        })
    }
}

fn parse_count_var(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse::<usize>().map_err(|_| {
            ConfigError::InvalidValue(
                name.to_string(),
                format!("'{}' is not a number", raw),
            )
        }),
        Err(_) => Ok(default),
    }
}
