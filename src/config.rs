//! Layered configuration.
//!
//! Built-in defaults, then an optional TOML/YAML/JSON file, then `UPSTAC__*`
//! environment variables (`UPSTAC__DATABASE__URL`, `UPSTAC__EVENTS__CHANNEL_CAPACITY`, ...).

use crate::error::{Result, UpstacError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstacConfig {
    pub environment: String,
    pub database: DatabaseConfig,
    pub events: EventConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub enabled: bool,
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Overrides the environment-derived filter when set, e.g. `"info,upstac_core=debug"`.
    pub filter: Option<String>,
    pub json: bool,
}

impl Default for UpstacConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            database: DatabaseConfig::default(),
            events: EventConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/upstac_development".to_string(),
            max_connections: 10,
            acquire_timeout_ms: 5000,
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel_capacity: 1000,
        }
    }
}

impl UpstacConfig {
    /// Load defaults overlaid with `UPSTAC__*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load defaults, then `path` (if given), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&UpstacConfig::default())?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("UPSTAC")
                .separator("__")
                .try_parsing(true),
        );

        let config: UpstacConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            environment = %config.environment,
            max_connections = config.database.max_connections,
            events_enabled = config.events.enabled,
            "Configuration loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(UpstacError::ConfigurationError(
                "database.url must not be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(UpstacError::ConfigurationError(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        if self.events.channel_capacity == 0 {
            return Err(UpstacError::ConfigurationError(
                "events.channel_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
