//! Triage CLI
//!
//! Interactive debugging console: narrow a log query, pull the matching
//! lines, the code they implicate, and a diagnosis from the backend.

mod commands;
mod config;
mod render;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Log-driven debugging console", long_about = None)]
struct Cli {
    /// Diagnosis backend URL
    #[arg(
        long,
        global = true,
        env = "TRIAGE_BACKEND_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    backend_url: String,

    /// Gateway URL for repository browsing
    #[arg(
        long,
        global = true,
        env = "TRIAGE_GATEWAY_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    gateway_url: String,

    /// Per-request timeout in seconds (unset waits indefinitely)
    #[arg(long, global = true, env = "TRIAGE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered views
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        backend_url: cli.backend_url,
        gateway_url: cli.gateway_url,
        timeout: cli.timeout_secs.map(Duration::from_secs),
    };

    handle_command(cli.command.unwrap_or(Commands::Console), &config).await
}
