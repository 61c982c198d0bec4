//! Triage HTTP Client
//!
//! A type-safe HTTP client for the diagnosis backend, and the pipeline
//! controller that sequences the Logs → Code → Analysis stages against it.
//!
//! # Example
//!
//! ```no_run
//! use triage_client::{BackendClient, PipelineController};
//! use triage_core::domain::query::{Environment, QueryParameters, parse_timestamp};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BackendClient::new("http://127.0.0.1:8000");
//!     let mut controller = PipelineController::new(client);
//!
//!     controller
//!         .fetch_logs(QueryParameters {
//!             environment: Environment::NonProduction,
//!             source: "QA".to_string(),
//!             start_time: parse_timestamp("2025-02-10T16:45")?,
//!             end_time: parse_timestamp("2025-02-10T16:55")?,
//!             error_message: "QueryComposerFactory".to_string(),
//!         })
//!         .await;
//!
//!     println!("{} log line(s)", controller.state().logs().len());
//!     Ok(())
//! }
//! ```

mod backend;
pub mod controller;
pub mod error;
mod repos;
mod stages;

// Re-export commonly used types
pub use backend::DebugBackend;
pub use controller::{Dispatch, PipelineController, SkipReason};
pub use error::{ClientError, Result};

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP client for the diagnosis backend
///
/// Methods are organized into two groups:
/// - Pipeline stages (`/logs`, `/code`, `/debug`)
/// - Repository browsing (`/analysis`, `/code`, `/logs` keyed by `repo`)
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL of the backend (e.g., "http://127.0.0.1:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// No request timeout is applied; a hung backend call stays pending.
    ///
    /// # Example
    /// ```
    /// use triage_client::BackendClient;
    ///
    /// let client = BackendClient::new("http://127.0.0.1:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// A non-success status whose body carries an `error` field becomes
    /// [`ClientError::Backend`]; any other non-success status is an
    /// [`ClientError::ApiError`].
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Some(msg) = reported_error(&error_text) {
                return Err(ClientError::Backend(msg));
            }
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Pull a usable `error` string out of an error body, if there is one
fn reported_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(msg) if !msg.is_empty() => Some(msg.clone()),
        _ => None,
    }
}
