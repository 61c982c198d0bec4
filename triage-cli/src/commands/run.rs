//! One-shot pipeline run
//!
//! Fills a query form from flags and drives the pipeline through the
//! requested stage without prompting.

use anyhow::{Result, bail};
use clap::ValueEnum;
use triage_client::PipelineController;
use triage_core::clock::{Clock, SystemClock};
use triage_core::domain::pipeline::Stage;
use triage_core::domain::query::Environment;
use triage_core::form::QueryForm;

use crate::config::Config;
use crate::render;

/// Last stage a run reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Through {
    Logs,
    Code,
    Debug,
}

impl From<Through> for Stage {
    fn from(through: Through) -> Self {
        match through {
            Through::Logs => Stage::Logs,
            Through::Code => Stage::Code,
            Through::Debug => Stage::Analysis,
        }
    }
}

/// Flag values for one run
#[derive(Debug, Clone)]
pub struct RunQuery {
    pub environment: Environment,
    pub source: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub error_message: String,
}

impl RunQuery {
    /// Build a form, defaulting unset times from `clock`
    pub fn into_form(self, clock: &dyn Clock) -> Result<QueryForm> {
        let mut form = QueryForm::new();
        form.set_environment(self.environment);
        form.set_source(&self.source)?;
        if let Some(start) = &self.start {
            form.set_start_time(start)?;
        }
        if let Some(end) = &self.end {
            form.set_end_time(end)?;
        }
        form.set_error_message(self.error_message);
        form.initialize_time(clock);
        Ok(form)
    }
}

/// Run the pipeline once and print the final view
pub async fn run_pipeline(config: &Config, query: RunQuery, through: Through) -> Result<()> {
    let form = query.into_form(&SystemClock)?;
    let Some(params) = form.parameters() else {
        bail!("Missing required fields: {}", form.missing_fields().join(", "));
    };

    tracing::info!(
        "Running {} / {} through {:?}",
        params.environment,
        params.source,
        through
    );
    let mut controller = PipelineController::new(config.backend_client()?);
    let report = controller.run(params, through.into()).await;

    for (stage, dispatch) in &report {
        render::print_dispatch(*stage, *dispatch, controller.state());
    }
    println!();
    render::print_view(controller.state(), controller.state().active_view());

    if let Some((stage, _)) = report.iter().find(|(_, d)| !d.succeeded()) {
        bail!("{} stage did not complete", stage);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use triage_core::clock::FixedClock;
    use triage_core::domain::query::parse_timestamp;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 2, 10, 16, 55, 42).unwrap())
    }

    fn query() -> RunQuery {
        RunQuery {
            environment: Environment::NonProduction,
            source: "QA".to_string(),
            start: Some("2025-02-10T16:45".to_string()),
            end: None,
            error_message: "QueryComposerFactory".to_string(),
        }
    }

    #[test]
    fn test_unset_end_defaults_to_now() {
        let form = query().into_form(&clock()).unwrap();
        let params = form.parameters().unwrap();

        assert_eq!(params.start_time, parse_timestamp("2025-02-10T16:45").unwrap());
        assert_eq!(params.end_time, parse_timestamp("2025-02-10T16:55").unwrap());
    }

    #[test]
    fn test_source_must_belong_to_environment() {
        let query = RunQuery {
            source: "Windstream".to_string(),
            ..query()
        };
        assert!(query.into_form(&clock()).is_err());
    }

    #[test]
    fn test_blank_error_message_leaves_form_incomplete() {
        let query = RunQuery {
            error_message: "   ".to_string(),
            ..query()
        };
        let form = query.into_form(&clock()).unwrap();
        assert!(form.parameters().is_none());
        assert_eq!(form.missing_fields(), vec!["error message"]);
    }

    #[test]
    fn test_through_maps_debug_to_analysis() {
        assert_eq!(Stage::from(Through::Debug), Stage::Analysis);
        assert_eq!(Stage::from(Through::Logs), Stage::Logs);
    }
}
