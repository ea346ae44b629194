//! Media duration probe
//!
//! Asks `ffprobe` for the container duration of a local file or URL and
//! reports it in seconds. Each invocation is bounded by the configured cutoff
//! and killed if the run is cancelled.

use crate::config::ProbeConfig;
use crate::core::item::{ItemError, ItemProcessor, ItemResult};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const FFPROBE_ARGS: [&str; 6] = [
    "-v",
    "error",
    "-show_entries",
    "format=duration",
    "-of",
    "default=noprint_wrappers=1:nokey=1",
];

/// Probe answering "how many seconds long is this media?"
#[derive(Debug, Clone)]
pub struct DurationProbe {
    program: String,
    timeout: Duration,
}

impl DurationProbe {
    pub fn new(config: &ProbeConfig) -> Self {
        Self::with_program(config.ffprobe_path.clone(), config.media_timeout())
    }

    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, source: &str) -> ItemResult<f64> {
        let mut command = Command::new(&self.program);
        command
            .args(FFPROBE_ARGS)
            .arg("-i")
            .arg(source)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ItemError::Failed(format!(
                    "failed to run {}: {}",
                    self.program, e
                )));
            }
            Err(_) => return Err(ItemError::Timeout),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.lines().next().unwrap_or("no diagnostics").trim();
            debug!(status = %output.status, "ffprobe failed: {}", reason);
            return Err(ItemError::Decode(reason.to_string()));
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse ffprobe's bare `format=duration` output into seconds
pub fn parse_duration(output: &str) -> ItemResult<f64> {
    let text = output.lines().map(str::trim).find(|l| !l.is_empty());
    match text {
        None => Err(ItemError::Decode("no duration reported".to_string())),
        Some(text) => match text.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
            _ => Err(ItemError::Decode(format!("unrecognised duration '{}'", text))),
        },
    }
}

#[async_trait]
impl ItemProcessor for DurationProbe {
    type Output = f64;

    async fn process(&self, item: &str, cancel: &CancellationToken) -> ItemResult<f64> {
        let source = item.trim();
        if source.is_empty() {
            return Err(ItemError::failed("empty media source"));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ItemError::Cancelled),
            result = self.run(source) => result,
        }
    }
}
