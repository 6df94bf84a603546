//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TRIAGE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use adaptive_triage::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Catalog path: {:?}", config.catalog.path);
//! ```

mod catalog;
mod engine;
mod error;
mod logging;

pub use catalog::CatalogConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// configuration over the built-in dengue catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Catalog and priors sources
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Engine policies
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TRIAGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TRIAGE__CATALOG__PATH=./catalogs/dengue.yaml` -> `catalog.path`
    /// - `TRIAGE__ENGINE__POST_EMERGENCY=record` -> `engine.post_emergency`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TRIAGE")
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
    /// Returns `ValidationError` if a referenced file is missing or the log
    /// level is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.catalog.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
