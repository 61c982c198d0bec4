//! Repository command handler
//!
//! Fetches stored repository records from the gateway.

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use serde_json::Value;

use crate::config::Config;

/// Repository record kinds served by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepoKind {
    Analysis,
    Code,
    Logs,
}

/// Fetch and print one repository record
pub async fn show_repo(config: &Config, kind: RepoKind, repo: &str) -> Result<()> {
    let client = config.gateway_client()?;

    let body = match kind {
        RepoKind::Analysis => client.repo_analysis(repo).await.map(|r| r.analysis),
        RepoKind::Code => client.repo_code(repo).await.map(|r| r.snippets),
        RepoKind::Logs => client.repo_logs(repo).await.map(|r| r.logs),
    }
    .with_context(|| format!("Failed to fetch {:?} for repository {}", kind, repo))?;

    match body {
        Some(Value::String(text)) => println!("{}", text),
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("{}", format!("No {:?} stored for {}.", kind, repo).yellow()),
    }

    Ok(())
}
