//! Gateway configuration
//!
//! Loaded from the environment with local-development defaults.

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// Diagnosis backend base URL (e.g., "http://127.0.0.1:8000")
    pub backend_url: String,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - GATEWAY_BIND_ADDR (optional, default: 0.0.0.0:3000)
    /// - TRIAGE_BACKEND_URL (optional, default: http://127.0.0.1:8000)
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("GATEWAY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let backend_url = std::env::var("TRIAGE_BACKEND_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

        Self {
            bind_addr,
            backend_url,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!("backend_url must start with http:// or https://");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            backend_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}
