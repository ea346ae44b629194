//! Configuration models

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Requested number of concurrent workers (0 = one per processor)
    pub concurrency: usize,
}

/// Per-item probe configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Total timeout for one reachability request, in seconds
    pub http_timeout_secs: u64,
    /// Cutoff for one media duration probe, in seconds
    pub media_timeout_secs: u64,
    /// Path or name of the ffprobe executable
    pub ffprobe_path: String,
    /// User agent sent by the reachability probe
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            media_timeout_secs: default_media_timeout(),
            ffprobe_path: default_ffprobe_path(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    /// Reachability timeout as a duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Media probe cutoff as a duration
    pub fn media_timeout(&self) -> Duration {
        Duration::from_secs(self.media_timeout_secs)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Invalid log format: {}", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive, overridden by `RUST_LOG`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_http_timeout() -> u64 {
    10
}

fn default_media_timeout() -> u64 {
    10
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_user_agent() -> String {
    format!("gridprobe/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}
