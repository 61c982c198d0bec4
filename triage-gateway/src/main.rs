//! Triage Gateway
//!
//! Thin pass-through surface for repository browsing. Each route forwards
//! `repo` to the diagnosis backend and copies one field of its answer back.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod service;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triage_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Triage Gateway...");

    let config = Config::from_env();
    config.validate()?;

    tracing::info!("Forwarding to backend at {}", config.backend_url);

    // Build router with all API endpoints
    let app = api::create_router(service::GatewayState::new(&config.backend_url));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
