//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod console;
mod repo;
mod run;

pub use repo::RepoKind;
pub use run::Through;

use anyhow::Result;
use clap::Subcommand;
use triage_core::domain::query::Environment;

use crate::config::Config;
use crate::render;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Interactive debugging console (default)
    Console,
    /// Run the pipeline once for a fully specified query
    Run {
        /// Environment (production or non-production)
        #[arg(short, long)]
        env: Environment,

        /// Log source within the environment
        #[arg(short, long)]
        source: String,

        /// Window start, YYYY-MM-DDTHH:MM (defaults to now)
        #[arg(long)]
        start: Option<String>,

        /// Window end, YYYY-MM-DDTHH:MM (defaults to now)
        #[arg(long)]
        end: Option<String>,

        /// Error message to filter on
        #[arg(short = 'm', long)]
        error: String,

        /// Last stage to run
        #[arg(long, value_enum, default_value = "debug")]
        through: Through,
    },
    /// List environments, sources, and resolved log identifiers
    Sources,
    /// Query stored repository data through the gateway
    Repo {
        /// Which record to fetch
        #[arg(value_enum)]
        kind: RepoKind,

        /// Repository name
        #[arg(short, long)]
        repo: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Console => console::run_console(config).await,
        Commands::Run {
            env,
            source,
            start,
            end,
            error,
            through,
        } => {
            let query = run::RunQuery {
                environment: env,
                source,
                start,
                end,
                error_message: error,
            };
            run::run_pipeline(config, query, through).await
        }
        Commands::Sources => {
            render::print_sources();
            Ok(())
        }
        Commands::Repo { kind, repo } => repo::show_repo(config, kind, &repo).await,
    }
}
