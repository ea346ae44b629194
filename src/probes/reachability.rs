//! HTTP reachability probe
//!
//! Issues a GET for each URL and reports whether the server answered with a
//! success status. Only the response head is awaited; the body is never read.

use crate::config::ProbeConfig;
use crate::core::item::{ItemError, ItemProcessor, ItemResult};
use crate::utils::error::{GridError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Probe answering "does this URL respond with 2xx?"
#[derive(Debug, Clone)]
pub struct ReachabilityProbe {
    client: Client,
    timeout: Duration,
}

impl ReachabilityProbe {
    /// Create a probe from the probe configuration
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        Self::with_timeout(config.http_timeout(), &config.user_agent)
    }

    /// Create a probe with an explicit per-request timeout
    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GridError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn check(&self, url: Url) -> ItemResult<bool> {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    debug!("Reachability check returned status={}", status);
                }
                Ok(status.is_success())
            }
            Err(e) if e.is_timeout() => Err(ItemError::Timeout),
            Err(e) if e.is_builder() => Err(ItemError::Failed(e.to_string())),
            Err(e) => Err(ItemError::Network(e.to_string())),
        }
    }
}

#[async_trait]
impl ItemProcessor for ReachabilityProbe {
    type Output = bool;

    async fn process(&self, item: &str, cancel: &CancellationToken) -> ItemResult<bool> {
        let url = Url::parse(item.trim())
            .map_err(|e| ItemError::Failed(format!("invalid URL '{}': {}", item, e)))?;

        tokio::select! {
            _ = cancel.cancelled() => Err(ItemError::Cancelled),
            result = self.check(url) => result,
        }
    }
}
