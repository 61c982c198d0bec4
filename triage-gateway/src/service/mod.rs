//! Service Module
//!
//! Forwarding logic between the HTTP layer and the diagnosis backend.

pub mod repo;

// Re-export for convenience
pub use repo as repo_service;

use triage_client::BackendClient;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub client: BackendClient,
}

impl GatewayState {
    pub fn new(backend_url: &str) -> Self {
        Self {
            client: BackendClient::new(backend_url),
        }
    }
}
