//! Configuration management for gridprobe
//!
//! Configuration comes from a YAML file, then `GRIDPROBE_*` environment
//! variables, then command-line flags. A value set in a later layer always
//! replaces the earlier one, even when it equals the default.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for gridprobe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine configuration
    pub engine: EngineConfig,
    /// Probe configuration
    pub probes: ProbeConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GridError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Apply `GRIDPROBE_*` environment variables on top of this configuration
    pub fn with_env(self) -> Result<Self> {
        info!("Applying configuration from environment variables");
        self.with_lookup(|key| env::var(key).ok())
    }

    /// Apply every variable `lookup` knows on top of this configuration.
    ///
    /// A present variable always wins; absent ones leave the field as is.
    pub fn with_lookup<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self;

        if let Some(concurrency) = lookup("GRIDPROBE_CONCURRENCY") {
            config.engine.concurrency = concurrency
                .parse()
                .map_err(|e| GridError::Config(format!("Invalid concurrency: {}", e)))?;
        }
        if let Some(timeout) = lookup("GRIDPROBE_HTTP_TIMEOUT") {
            config.probes.http_timeout_secs = timeout
                .parse()
                .map_err(|e| GridError::Config(format!("Invalid HTTP timeout: {}", e)))?;
        }
        if let Some(timeout) = lookup("GRIDPROBE_MEDIA_TIMEOUT") {
            config.probes.media_timeout_secs = timeout
                .parse()
                .map_err(|e| GridError::Config(format!("Invalid media timeout: {}", e)))?;
        }
        if let Some(path) = lookup("GRIDPROBE_FFPROBE") {
            config.probes.ffprobe_path = path;
        }
        if let Some(level) = lookup("GRIDPROBE_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = lookup("GRIDPROBE_LOG_FORMAT") {
            config.logging.format = format.parse().map_err(GridError::Config)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.engine
            .validate()
            .map_err(|e| GridError::Config(format!("Engine config error: {}", e)))?;
        self.probes
            .validate()
            .map_err(|e| GridError::Config(format!("Probe config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| GridError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
