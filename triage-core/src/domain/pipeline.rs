//! Pipeline domain types
//!
//! The three-stage state (Logs → Code → Analysis) and the reducer that moves
//! it forward. Every mutation goes through [`reduce`]: a stage is requested,
//! then completed with a tagged [`StageOutcome`]. Each completion replaces or
//! clears its slice of state in a single step, so a reader never sees a
//! half-applied response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::code::CodeSnippet;
use crate::domain::log::LogEntry;
use crate::domain::query::ParseError;

/// A discrete pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Logs,
    Code,
    Analysis,
}

impl Stage {
    /// The result view a successful completion of this stage advances to
    pub fn view(&self) -> ActiveView {
        match self {
            Stage::Logs => ActiveView::Logs,
            Stage::Code => ActiveView::Code,
            Stage::Analysis => ActiveView::Analysis,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Logs => "logs",
            Stage::Code => "code",
            Stage::Analysis => "analysis",
        };
        f.write_str(name)
    }
}

/// Which result set is presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    #[default]
    Logs,
    Code,
    Analysis,
}

impl ActiveView {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveView::Logs => "logs",
            ActiveView::Code => "code",
            ActiveView::Analysis => "analysis",
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActiveView {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logs" => Ok(ActiveView::Logs),
            "code" => Ok(ActiveView::Code),
            "analysis" | "debug" => Ok(ActiveView::Analysis),
            _ => Err(ParseError::UnknownView(s.to_string())),
        }
    }
}

/// Per-stage lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StageStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Position in the pipeline state machine, derived from the stage statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    LogsLoading,
    LogsReady,
    LogsFailed,
    CodeLoading,
    CodeReady,
    CodeFailed,
    AnalysisLoading,
    AnalysisReady,
    AnalysisFailed,
}

/// Tagged result of one stage's network call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome<T> {
    /// The backend answered without an error indicator
    Success(T),
    /// The backend answered with an `error` field
    BackendError(String),
    /// The call never produced a usable answer (connect, status, decode)
    TransportError(String),
}

impl<T> StageOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            StageOutcome::Success(_) => None,
            StageOutcome::BackendError(msg) | StageOutcome::TransportError(msg) => Some(msg),
        }
    }
}

/// Everything a successful logs call can carry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogsPayload {
    pub logs: Vec<LogEntry>,
    pub code_snippets: Vec<CodeSnippet>,
    pub analysis: Option<String>,
}

/// Identifies one dispatched request for a stage
///
/// Only the ticket matching the stage's current generation may complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    stage: Stage,
    generation: u64,
}

impl RequestTicket {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Inputs to the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Requested(Stage),
    LogsCompleted {
        ticket: RequestTicket,
        outcome: StageOutcome<LogsPayload>,
    },
    CodeCompleted {
        ticket: RequestTicket,
        outcome: StageOutcome<Vec<CodeSnippet>>,
    },
    AnalysisCompleted {
        ticket: RequestTicket,
        outcome: StageOutcome<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct StageTrack {
    status: StageStatus,
    generation: u64,
}

impl StageTrack {
    /// Forget the current request and return to idle; any in-flight ticket goes stale
    fn reset(&mut self) {
        self.status = StageStatus::Idle;
        self.generation += 1;
    }
}

/// Aggregate session state owned by the pipeline controller
///
/// Equality compares what a reader can observe (results, errors, view and
/// per-stage status) and ignores request generations.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    logs: Vec<LogEntry>,
    code: Vec<CodeSnippet>,
    analysis: String,
    debug_info: String,
    logs_error: Option<String>,
    code_error: Option<String>,
    analysis_error: Option<String>,
    active_view: ActiveView,
    logs_stage: StageTrack,
    code_stage: StageTrack,
    analysis_stage: StageTrack,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn code(&self) -> &[CodeSnippet] {
        &self.code
    }

    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    pub fn debug_info(&self) -> &str {
        &self.debug_info
    }

    pub fn logs_error(&self) -> Option<&str> {
        self.logs_error.as_deref()
    }

    pub fn code_error(&self) -> Option<&str> {
        self.code_error.as_deref()
    }

    pub fn analysis_error(&self) -> Option<&str> {
        self.analysis_error.as_deref()
    }

    pub fn error(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::Logs => self.logs_error(),
            Stage::Code => self.code_error(),
            Stage::Analysis => self.analysis_error(),
        }
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn status(&self, stage: Stage) -> StageStatus {
        self.track(stage).status
    }

    pub fn is_loading(&self, stage: Stage) -> bool {
        self.status(stage) == StageStatus::Loading
    }

    /// Whether `ticket` still identifies the stage's outstanding request
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let track = self.track(ticket.stage);
        track.status == StageStatus::Loading && track.generation == ticket.generation
    }

    /// Current state-machine position
    ///
    /// An outstanding request wins, checked in dependency order, so a logs
    /// re-trigger reads as `LogsLoading` even while older code results remain.
    /// Otherwise this is the furthest stage that has left idle.
    pub fn phase(&self) -> Phase {
        if self.logs_stage.status == StageStatus::Loading {
            return Phase::LogsLoading;
        }
        if self.code_stage.status == StageStatus::Loading {
            return Phase::CodeLoading;
        }
        match self.analysis_stage.status {
            StageStatus::Loading => return Phase::AnalysisLoading,
            StageStatus::Ready => return Phase::AnalysisReady,
            StageStatus::Failed => return Phase::AnalysisFailed,
            StageStatus::Idle => {}
        }
        match self.code_stage.status {
            StageStatus::Ready => return Phase::CodeReady,
            StageStatus::Failed => return Phase::CodeFailed,
            StageStatus::Loading | StageStatus::Idle => {}
        }
        match self.logs_stage.status {
            StageStatus::Loading => Phase::LogsLoading,
            StageStatus::Ready => Phase::LogsReady,
            StageStatus::Failed => Phase::LogsFailed,
            StageStatus::Idle => Phase::Idle,
        }
    }

    /// Mark `stage` as loading and hand out the ticket its completion must carry
    ///
    /// Returns `None` while the stage already has a request outstanding.
    pub fn begin(&mut self, stage: Stage) -> Option<RequestTicket> {
        if self.is_loading(stage) {
            tracing::warn!("{} request already in flight, ignoring trigger", stage);
            return None;
        }

        let state = std::mem::take(self);
        *self = reduce(state, PipelineEvent::Requested(stage));

        Some(RequestTicket {
            stage,
            generation: self.track(stage).generation,
        })
    }

    /// Feed a completion event through the reducer
    ///
    /// Returns `false` when the event was stale and left the state untouched.
    pub fn complete(&mut self, event: PipelineEvent) -> bool {
        let ticket = match &event {
            PipelineEvent::Requested(_) => None,
            PipelineEvent::LogsCompleted { ticket, .. }
            | PipelineEvent::CodeCompleted { ticket, .. }
            | PipelineEvent::AnalysisCompleted { ticket, .. } => Some(*ticket),
        };
        if let Some(ticket) = ticket
            && !self.is_current(&ticket)
        {
            tracing::debug!(
                "dropping stale {} response (generation {})",
                ticket.stage,
                ticket.generation
            );
            return false;
        }

        let state = std::mem::take(self);
        *self = reduce(state, event);
        true
    }

    /// Settle a request whose caller gave up before it answered
    ///
    /// Treated as a transport failure carrying `message`, so the stage leaves
    /// `Loading` and can be triggered again. Returns `false` if the ticket was
    /// already settled or superseded.
    pub fn abandon(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        let message = message.into();
        let event = match ticket.stage {
            Stage::Logs => PipelineEvent::LogsCompleted {
                ticket,
                outcome: StageOutcome::TransportError(message),
            },
            Stage::Code => PipelineEvent::CodeCompleted {
                ticket,
                outcome: StageOutcome::TransportError(message),
            },
            Stage::Analysis => PipelineEvent::AnalysisCompleted {
                ticket,
                outcome: StageOutcome::TransportError(message),
            },
        };
        self.complete(event)
    }

    fn track(&self, stage: Stage) -> &StageTrack {
        match stage {
            Stage::Logs => &self.logs_stage,
            Stage::Code => &self.code_stage,
            Stage::Analysis => &self.analysis_stage,
        }
    }

    fn track_mut(&mut self, stage: Stage) -> &mut StageTrack {
        match stage {
            Stage::Logs => &mut self.logs_stage,
            Stage::Code => &mut self.code_stage,
            Stage::Analysis => &mut self.analysis_stage,
        }
    }

    /// Drop everything derived from the current logs, invalidating in-flight downstream calls
    fn reset_downstream(&mut self) {
        self.code.clear();
        self.analysis.clear();
        self.debug_info.clear();
        self.code_error = None;
        self.analysis_error = None;
        self.code_stage.reset();
        self.analysis_stage.reset();
    }
}

impl PartialEq for PipelineState {
    fn eq(&self, other: &Self) -> bool {
        self.logs == other.logs
            && self.code == other.code
            && self.analysis == other.analysis
            && self.debug_info == other.debug_info
            && self.logs_error == other.logs_error
            && self.code_error == other.code_error
            && self.analysis_error == other.analysis_error
            && self.active_view == other.active_view
            && self.logs_stage.status == other.logs_stage.status
            && self.code_stage.status == other.code_stage.status
            && self.analysis_stage.status == other.analysis_stage.status
    }
}

impl Eq for PipelineState {}

/// Pipeline reducer
///
/// Pure transition from one state to the next. Completions whose ticket does
/// not match the stage's outstanding request leave the state unchanged.
pub fn reduce(mut state: PipelineState, event: PipelineEvent) -> PipelineState {
    match event {
        PipelineEvent::Requested(stage) => {
            let track = state.track_mut(stage);
            if track.status != StageStatus::Loading {
                track.generation += 1;
                track.status = StageStatus::Loading;
            }
        }
        PipelineEvent::LogsCompleted { ticket, outcome } => {
            if !state.is_current(&ticket) {
                return state;
            }
            state.reset_downstream();
            match outcome {
                StageOutcome::Success(payload) => {
                    // Logs land first; anything derived from the same response follows.
                    state.logs = payload.logs;
                    state.logs_error = None;
                    state.logs_stage.status = StageStatus::Ready;
                    state.active_view = ActiveView::Logs;

                    if !payload.code_snippets.is_empty() {
                        state.code = payload.code_snippets;
                        state.code_stage.status = StageStatus::Ready;
                        state.active_view = ActiveView::Code;
                    }

                    if let Some(analysis) = payload.analysis
                        && !analysis.trim().is_empty()
                    {
                        state.analysis = analysis;
                        state.analysis_stage.status = StageStatus::Ready;
                        state.active_view = ActiveView::Analysis;
                    }
                }
                StageOutcome::BackendError(msg) | StageOutcome::TransportError(msg) => {
                    state.logs.clear();
                    state.logs_error = Some(msg);
                    state.logs_stage.status = StageStatus::Failed;
                }
            }
        }
        PipelineEvent::CodeCompleted { ticket, outcome } => {
            if !state.is_current(&ticket) {
                return state;
            }
            match outcome {
                StageOutcome::Success(snippets) => {
                    state.code = snippets;
                    state.code_error = None;
                    state.code_stage.status = StageStatus::Ready;
                    state.active_view = ActiveView::Code;
                }
                StageOutcome::BackendError(msg) | StageOutcome::TransportError(msg) => {
                    state.code.clear();
                    state.code_error = Some(msg);
                    state.code_stage.status = StageStatus::Failed;
                }
            }
        }
        PipelineEvent::AnalysisCompleted { ticket, outcome } => {
            if !state.is_current(&ticket) {
                return state;
            }
            match outcome {
                StageOutcome::Success(text) => {
                    state.debug_info = text.clone();
                    state.analysis = text;
                    state.analysis_error = None;
                    state.analysis_stage.status = StageStatus::Ready;
                    state.active_view = ActiveView::Analysis;
                }
                StageOutcome::BackendError(msg) | StageOutcome::TransportError(msg) => {
                    state.debug_info.clear();
                    state.analysis.clear();
                    state.analysis_error = Some(msg);
                    state.analysis_stage.status = StageStatus::Failed;
                }
            }
        }
    }
    state
}
