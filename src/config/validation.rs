//! Configuration validation

use super::models::*;
use tracing::Level;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for ProbeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.http_timeout_secs == 0 {
            return Err("HTTP timeout cannot be 0".to_string());
        }
        if self.media_timeout_secs == 0 {
            return Err("Media timeout cannot be 0".to_string());
        }
        if self.ffprobe_path.trim().is_empty() {
            return Err("ffprobe path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        self.level
            .parse::<Level>()
            .map(|_| ())
            .map_err(|_| format!("Invalid log level: {}", self.level))
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
