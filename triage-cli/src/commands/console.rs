//! Interactive console
//!
//! A line-oriented REPL over one query form and one pipeline session.

use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use triage_client::{DebugBackend, Dispatch, PipelineController};
use triage_core::clock::{Clock, SystemClock};
use triage_core::domain::pipeline::{ActiveView, Stage, StageStatus};
use triage_core::domain::query::Environment;
use triage_core::form::QueryForm;

use crate::config::Config;
use crate::render;

const HELP: &str = "\
Commands:
  env <production|non-production>   choose the environment
  source <name>                     choose a log source
  start <YYYY-MM-DDTHH:MM>          set the window start
  end <YYYY-MM-DDTHH:MM>            set the window end
  error <text...>                   set the error message filter
  logs                              fetch matching logs
  code                              extract code from the current logs
  debug                             analyze the current logs and code
  show [logs|code|analysis]         print a result view
  status                            print the query and pipeline status
  sources                           list environments and sources
  help                              print this help
  quit                              leave the console";

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Env(Environment),
    Source(String),
    Start(String),
    End(String),
    Error(String),
    Logs,
    Code,
    Debug,
    Show(Option<ActiveView>),
    Status,
    Sources,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        let command = match word.to_lowercase().as_str() {
            "env" => ConsoleCommand::Env(required(word, rest)?.parse()?),
            "source" => ConsoleCommand::Source(required(word, rest)?.to_string()),
            "start" => ConsoleCommand::Start(required(word, rest)?.to_string()),
            "end" => ConsoleCommand::End(required(word, rest)?.to_string()),
            // an empty filter is allowed; it just keeps the logs trigger closed
            "error" => ConsoleCommand::Error(rest.to_string()),
            "logs" => ConsoleCommand::Logs,
            "code" => ConsoleCommand::Code,
            "debug" => ConsoleCommand::Debug,
            "show" if rest.is_empty() => ConsoleCommand::Show(None),
            "show" => ConsoleCommand::Show(Some(rest.parse()?)),
            "status" => ConsoleCommand::Status,
            "sources" => ConsoleCommand::Sources,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => bail!("unknown command '{}' (try 'help')", other),
        };

        Ok(command)
    }
}

fn required<'a>(command: &str, arg: &'a str) -> Result<&'a str> {
    if arg.is_empty() {
        return Err(anyhow!("'{}' needs an argument", command));
    }
    Ok(arg)
}

/// Whether the loop keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Form plus pipeline for one console run
pub struct Session<B> {
    form: QueryForm,
    controller: PipelineController<B>,
}

impl<B: DebugBackend> Session<B> {
    /// Start a session; the time fields are initialized from `clock` once, here
    pub fn new(backend: B, clock: &dyn Clock) -> Self {
        let mut form = QueryForm::new();
        form.initialize_time(clock);
        Self {
            form,
            controller: PipelineController::new(backend),
        }
    }

    pub fn form(&self) -> &QueryForm {
        &self.form
    }

    pub fn controller(&self) -> &PipelineController<B> {
        &self.controller
    }

    /// Apply one command, printing whatever it produces
    pub async fn execute(&mut self, command: ConsoleCommand) -> Result<Flow> {
        match command {
            ConsoleCommand::Env(environment) => {
                self.form.set_environment(environment);
                println!("Environment set to {}", environment.to_string().cyan());
            }
            ConsoleCommand::Source(name) => {
                self.form.set_source(&name)?;
                println!("Source set to {}", name.cyan());
            }
            ConsoleCommand::Start(input) => self.form.set_start_time(&input)?,
            ConsoleCommand::End(input) => self.form.set_end_time(&input)?,
            ConsoleCommand::Error(text) => self.form.set_error_message(text),
            ConsoleCommand::Logs => {
                let Some(params) = self.form.parameters() else {
                    bail!(
                        "Missing required fields: {}",
                        self.form.missing_fields().join(", ")
                    );
                };
                let dispatch = self.controller.fetch_logs(params).await;
                self.report(Stage::Logs, dispatch);
            }
            ConsoleCommand::Code => {
                let dispatch = self.controller.fetch_code().await;
                self.report(Stage::Code, dispatch);
            }
            ConsoleCommand::Debug => {
                let dispatch = self.controller.fetch_analysis().await;
                self.report(Stage::Analysis, dispatch);
            }
            ConsoleCommand::Show(view) => {
                let state = self.controller.state();
                render::print_view(state, view.unwrap_or(state.active_view()));
            }
            ConsoleCommand::Status => render::print_status(&self.form, self.controller.state()),
            ConsoleCommand::Sources => render::print_sources(),
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Print a trigger's outcome and, if the stage finished, the active view
    fn report(&self, stage: Stage, dispatch: Dispatch) {
        let state = self.controller.state();
        render::print_dispatch(stage, dispatch, state);
        if let Dispatch::Completed(StageStatus::Ready) = dispatch {
            render::print_view(state, state.active_view());
        }
    }
}

/// Run the console until `quit` or end of input
pub async fn run_console(config: &Config) -> Result<()> {
    let mut session = Session::new(config.backend_client()?, &SystemClock);
    tracing::info!("Console session started against {}", config.backend_url);

    println!("{}", "Triage console".bold());
    println!("{}", format!("backend: {}", config.backend_url).dimmed());
    println!("{}", "Type 'help' for commands.".dimmed());
    render::print_gates(&session.controller().gates(session.form()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "triage>".cyan().bold());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match ConsoleCommand::parse(&line) {
            Ok(command) => {
                tracing::debug!("Executing {:?}", command);
                session.execute(command).await
            }
            Err(err) => {
                tracing::debug!("Rejected input {:?}: {}", line, err);
                Err(err)
            }
        };
        match outcome {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => println!("{} {}", "✗".red().bold(), err),
        }

        render::print_gates(&session.controller().gates(session.form()));
    }

    tracing::info!("Console session ended");
    Ok(())
}
