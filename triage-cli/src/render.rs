//! Terminal rendering
//!
//! Everything the console prints about the form, the gates, and the three
//! result views lives here.

use colored::*;
use triage_client::{Dispatch, SkipReason};
use triage_core::domain::pipeline::{ActiveView, PipelineState, Stage, StageStatus};
use triage_core::domain::query::{Environment, format_timestamp};
use triage_core::form::QueryForm;
use triage_core::gate::Gates;
use triage_core::resolver::{resolve_log_group, resolve_log_source};

/// Print one result view
pub fn print_view(state: &PipelineState, view: ActiveView) {
    println!("{}", format!("── {} ──", view).bold());
    match view {
        ActiveView::Logs => print_logs(state),
        ActiveView::Code => print_code(state),
        ActiveView::Analysis => print_analysis(state),
    }
}

fn print_logs(state: &PipelineState) {
    if let Some(err) = state.logs_error() {
        println!("{}", err.red());
    }
    if state.logs().is_empty() {
        println!("{}", empty_logs_message(state).yellow());
        return;
    }
    let width = state.logs().len().to_string().len();
    for (i, line) in state.logs().iter().enumerate() {
        println!("{:>width$} {}", (i + 1).to_string().dimmed(), line);
    }
}

/// Tell "nothing asked yet" apart from "asked, nothing matched"
fn empty_logs_message(state: &PipelineState) -> &'static str {
    match state.status(Stage::Logs) {
        StageStatus::Idle => "No query yet. Fill in the form and run 'logs'.",
        StageStatus::Loading => "Fetching logs...",
        StageStatus::Ready | StageStatus::Failed => "No matching logs.",
    }
}

fn print_code(state: &PipelineState) {
    if let Some(err) = state.code_error() {
        println!("{}", err.red());
    }
    if state.code().is_empty() {
        println!("{}", "No code snippets.".yellow());
        return;
    }
    for snippet in state.code() {
        let file = if snippet.file.is_empty() {
            "(unknown file)"
        } else {
            snippet.file.as_str()
        };
        println!("{} {}", "▸".cyan(), file.bold());
        println!("{}", "─".repeat(80).dimmed());
        println!("{}", snippet.code);
        println!("{}", "─".repeat(80).dimmed());
    }
}

fn print_analysis(state: &PipelineState) {
    if let Some(err) = state.analysis_error() {
        println!("{}", err.red());
    }
    if state.analysis().trim().is_empty() {
        println!("{}", "No analysis yet.".yellow());
        return;
    }
    println!("{}", state.analysis());
}

/// Print the outcome of one trigger
pub fn print_dispatch(stage: Stage, dispatch: Dispatch, state: &PipelineState) {
    match dispatch {
        Dispatch::Completed(StageStatus::Ready) => {
            println!("{}", format!("✓ {} ready", stage).green().bold());
        }
        Dispatch::Completed(_) => {
            let msg = state.error(stage).unwrap_or("request failed");
            println!("{} {}: {}", "✗".red().bold(), stage, msg.red());
        }
        Dispatch::Skipped(SkipReason::InFlight) => {
            println!("{}", format!("… {} already loading", stage).yellow());
        }
        Dispatch::Skipped(reason) => {
            println!("{} {}: {}", "✗".red().bold(), stage, reason);
        }
        Dispatch::Stale => {
            println!("{}", format!("{} answer superseded", stage).dimmed());
        }
    }
}

/// Print which triggers are currently enabled
pub fn print_gates(gates: &Gates) {
    let mark = |label: &str, enabled: bool| {
        if enabled {
            format!("[{}]", label).green().bold()
        } else {
            format!("[{}]", label).dimmed()
        }
    };
    println!(
        "  {} {} {} {}",
        "triggers:".dimmed(),
        mark("logs", gates.fetch_logs),
        mark("code", gates.fetch_code),
        mark("debug", gates.debug)
    );
}

/// Print the form fields and the per-stage status
pub fn print_status(form: &QueryForm, state: &PipelineState) {
    let unset = || "(unset)".dimmed().to_string();

    println!("{}", "Query:".bold());
    println!(
        "  Environment: {}",
        form.environment()
            .map(|e| e.to_string().cyan().to_string())
            .unwrap_or_else(unset)
    );
    println!(
        "  Source:      {}",
        form.source()
            .map(|s| s.cyan().to_string())
            .unwrap_or_else(unset)
    );
    println!(
        "  Start:       {}",
        form.start_time()
            .map(|t| format_timestamp(&t))
            .unwrap_or_else(unset)
    );
    println!(
        "  End:         {}",
        form.end_time()
            .map(|t| format_timestamp(&t))
            .unwrap_or_else(unset)
    );
    let message = form.error_message().trim();
    println!(
        "  Error:       {}",
        if message.is_empty() {
            unset()
        } else {
            message.to_string()
        }
    );

    let missing = form.missing_fields();
    if !missing.is_empty() {
        println!("  Missing:     {}", missing.join(", ").yellow());
    }

    println!("{}", "Pipeline:".bold());
    for stage in [Stage::Logs, Stage::Code, Stage::Analysis] {
        println!("  {:<12} {}", format!("{}:", stage), status_label(state.status(stage)));
    }
    println!("  {:<12} {:?}", "phase:", state.phase());
    println!("  {:<12} {}", "view:", state.active_view().to_string().cyan());
}

fn status_label(status: StageStatus) -> ColoredString {
    match status {
        StageStatus::Idle => "idle".dimmed(),
        StageStatus::Loading => "loading".yellow(),
        StageStatus::Ready => "ready".green(),
        StageStatus::Failed => "failed".red(),
    }
}

/// Print environments, their sources, and the identifiers they resolve to
pub fn print_sources() {
    for environment in Environment::ALL {
        let group = resolve_log_group(environment.as_str()).unwrap_or("(unresolvable)");
        println!("{} {}", environment.to_string().bold(), group.dimmed());
        for source in environment.sources() {
            println!(
                "  {} {:<14} {}",
                "▸".cyan(),
                source,
                resolve_log_source(source).dimmed()
            );
        }
    }
}
