//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `INCIDENT_DIALOG` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working
//! prompt-only setup with in-memory storage.
//!
//! # Example
//!
//! ```no_run
//! use incident_dialog::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Recognizer enabled: {}", config.recognizer.is_configured());
//! ```

mod dialog;
mod error;
mod logging;
mod recognizer;
mod storage;

pub use dialog::DialogConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use recognizer::RecognizerConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Natural-language recognizer (LUIS) credentials
    #[serde(default)]
    pub recognizer: RecognizerConfig,

    /// Locale and prompt text
    #[serde(default)]
    pub dialog: DialogConfig,

    /// Conversation state storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INCIDENT_DIALOG` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `INCIDENT_DIALOG__RECOGNIZER__APPLICATION_ID=...` -> `recognizer.application_id = ...`
    /// - `INCIDENT_DIALOG__STORAGE__BACKEND=file` -> `storage.backend = file`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INCIDENT_DIALOG")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.recognizer.validate()?;
        self.dialog.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
