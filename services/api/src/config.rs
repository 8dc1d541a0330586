//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. Nothing in the core logic hardcodes
//! paths, ports, or limits; they all flow from here.

use reading_coach_core::GenerationOptions;
use std::net::SocketAddr;
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
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub export_dir: PathBuf,
    pub deepseek_api_key: Option<String>,
    pub generation_model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub generation: GenerationOptions,
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

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://english_learning.db?mode=rwc".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let export_dir = std::env::var("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./readings"));

        // --- Load Generation Client Settings ---
        let deepseek_api_key = std::env::var("DEEPSEEK_API_KEY").ok();
        let generation_model =
            std::env::var("GENERATION_MODEL").unwrap_or_else(|_| "deepseek-chat".to_string());
        let api_base = std::env::var("DEEPSEEK_API_BASE")
            .unwrap_or_else(|_| "https://api.deepseek.com/v1".to_string());
        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", 120)?;

        // --- Load Generation Tunables ---
        let defaults = GenerationOptions::default();
        let generation = GenerationOptions {
            max_attempts: parse_var("GENERATION_MAX_ATTEMPTS", defaults.max_attempts)?,
            history_limit: parse_var("CHAT_HISTORY_LIMIT", defaults.history_limit)?,
            context_turns: parse_var("CHAT_CONTEXT_TURNS", defaults.context_turns)?,
            task_excerpt_chars: parse_var("TASK_EXCERPT_CHARS", defaults.task_excerpt_chars)?,
            reply_excerpt_chars: parse_var("REPLY_EXCERPT_CHARS", defaults.reply_excerpt_chars)?,
            preview_chars: parse_var("PREVIEW_CHARS", defaults.preview_chars)?,
            retention_days: parse_var("CHAT_RETENTION_DAYS", defaults.retention_days)?,
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            export_dir,
            deepseek_api_key,
            generation_model,
            api_base,
            request_timeout_secs,
            generation,
        })
    }

    /// Returns the API key or fails with a clear diagnostic. Called before any
    /// network use so the system never attempts a call with an empty credential.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.deepseek_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingVar("DEEPSEEK_API_KEY".to_string())),
        }
    }
}

/// Parses an optional numeric environment variable, falling back to `default`.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
