//! Stage gates
//!
//! Readiness predicates for each stage trigger. The console uses them to
//! enable commands; the controller re-checks them before every call.

use crate::domain::pipeline::{PipelineState, Stage};
use crate::domain::query::QueryParameters;
use crate::form::QueryForm;

/// Environment, source, both times, and a non-blank error message are set
pub fn can_fetch_logs(form: &QueryForm) -> bool {
    form.parameters().is_some()
}

/// The same check for parameters that were already extracted from a form
pub fn parameters_ready(params: &QueryParameters) -> bool {
    !params.source.trim().is_empty() && !params.error_message.trim().is_empty()
}

/// At least one log entry is present
pub fn can_fetch_code(state: &PipelineState) -> bool {
    !state.logs().is_empty()
}

/// Logs and code snippets are both present
pub fn can_debug(state: &PipelineState) -> bool {
    !state.logs().is_empty() && !state.code().is_empty()
}

/// Snapshot of all three gates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gates {
    pub fetch_logs: bool,
    pub fetch_code: bool,
    pub debug: bool,
}

impl Gates {
    pub fn evaluate(form: &QueryForm, state: &PipelineState) -> Self {
        Self {
            fetch_logs: can_fetch_logs(form),
            fetch_code: can_fetch_code(state),
            debug: can_debug(state),
        }
    }

    pub fn allows(&self, stage: Stage) -> bool {
        match stage {
            Stage::Logs => self.fetch_logs,
            Stage::Code => self.fetch_code,
            Stage::Analysis => self.debug,
        }
    }
}
