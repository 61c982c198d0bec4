//! Configuration module
//!
//! Handles CLI configuration including service URLs and the request timeout.

use std::time::Duration;

use anyhow::{Context, Result};
use triage_client::BackendClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the diagnosis backend
    pub backend_url: String,
    /// URL of the repository-browsing gateway
    pub gateway_url: String,
    /// Per-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
}

impl Config {
    /// Client for the pipeline stages
    pub fn backend_client(&self) -> Result<BackendClient> {
        self.client_for(&self.backend_url)
    }

    /// Client for the repository routes, which the gateway serves with the same shapes
    pub fn gateway_client(&self) -> Result<BackendClient> {
        self.client_for(&self.gateway_url)
    }

    fn client_for(&self, url: &str) -> Result<BackendClient> {
        match self.timeout {
            Some(timeout) => BackendClient::with_timeout(url, timeout)
                .with_context(|| format!("Failed to build HTTP client for {}", url)),
            None => Ok(BackendClient::new(url)),
        }
    }
}
