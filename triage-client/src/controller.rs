//! Pipeline controller
//!
//! Owns the [`PipelineState`] for one session and sequences the three stages
//! against a [`DebugBackend`]. Every operation re-checks its gate before
//! touching the network, turns the backend's answer into a tagged
//! [`StageOutcome`], and hands it to the reducer in one step.

use std::fmt;

use tracing::{error, info, warn};
use triage_core::domain::pipeline::{
    PipelineEvent, PipelineState, RequestTicket, Stage, StageOutcome, StageStatus,
};
use triage_core::domain::query::{QueryParameters, format_timestamp};
use triage_core::dto::code::CodeRequest;
use triage_core::dto::debug::DebugRequest;
use triage_core::dto::logs::LogsQuery;
use triage_core::form::QueryForm;
use triage_core::gate::{self, Gates};
use triage_core::resolver::resolve_target;

use crate::backend::DebugBackend;
use crate::error::{ClientError, Result};

const LOGS_RETRY_MESSAGE: &str = "Error fetching logs. Please try again.";
const CODE_RETRY_MESSAGE: &str = "Error fetching code. Please try again.";
const ANALYSIS_RETRY_MESSAGE: &str = "Error fetching debugging info. Please try again.";

/// Why a trigger did not reach the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The stage's readiness predicate does not hold
    GateClosed,
    /// Environment or source could not be mapped to backend identifiers
    Unresolvable,
    /// A request for this stage is already outstanding
    InFlight,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::GateClosed => "stage is not ready",
            SkipReason::Unresolvable => "query could not be resolved",
            SkipReason::InFlight => "a request is already in flight",
        };
        f.write_str(text)
    }
}

/// What happened to one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The call ran and its outcome was applied; carries the stage's new status
    Completed(StageStatus),
    /// Nothing was sent
    Skipped(SkipReason),
    /// The call ran but a newer request owns the stage; the answer was dropped
    Stale,
}

impl Dispatch {
    pub fn succeeded(&self) -> bool {
        matches!(self, Dispatch::Completed(StageStatus::Ready))
    }
}

/// Drives Logs → Code → Analysis for one session
pub struct PipelineController<B> {
    backend: B,
    state: PipelineState,
}

impl<B: DebugBackend> PipelineController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: PipelineState::new(),
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current gates for the given form and this session's results
    pub fn gates(&self, form: &QueryForm) -> Gates {
        Gates::evaluate(form, &self.state)
    }

    /// Retrieve logs for `params`
    ///
    /// Validation failures never reach the network. On success the logs are
    /// replaced and any code or analysis carried by the same response follows.
    pub async fn fetch_logs(&mut self, params: QueryParameters) -> Dispatch {
        if !gate::parameters_ready(&params) {
            warn!("Missing required input fields, not fetching logs");
            return Dispatch::Skipped(SkipReason::GateClosed);
        }

        let Some(target) = resolve_target(&params) else {
            warn!(
                "Cannot resolve {} / {:?}, not fetching logs",
                params.environment, params.source
            );
            return Dispatch::Skipped(SkipReason::Unresolvable);
        };

        let query = LogsQuery {
            log_group: target.log_group.to_string(),
            log_stream: target.log_stream,
            start_time: format_timestamp(&params.start_time),
            end_time: format_timestamp(&params.end_time),
            error_message: params.error_message,
        };

        let Some(ticket) = self.state.begin(Stage::Logs) else {
            return Dispatch::Skipped(SkipReason::InFlight);
        };

        info!(
            "Fetching logs from {} ({}) between {} and {}",
            query.log_group, query.log_stream, query.start_time, query.end_time
        );
        let pending = PendingRequest::new(&mut self.state, ticket, LOGS_RETRY_MESSAGE);
        let outcome = into_outcome(
            self.backend.query_logs(&query).await,
            |resp| resp.into_outcome(),
            LOGS_RETRY_MESSAGE,
        );
        let applied = pending.settle(PipelineEvent::LogsCompleted { ticket, outcome });

        self.finish(Stage::Logs, applied)
    }

    /// Send the current logs to the code-extraction service
    pub async fn fetch_code(&mut self) -> Dispatch {
        if !gate::can_fetch_code(&self.state) {
            warn!("No logs available. Fetch logs first.");
            return Dispatch::Skipped(SkipReason::GateClosed);
        }

        let req = CodeRequest {
            logs: self.state.logs().to_vec(),
        };

        let Some(ticket) = self.state.begin(Stage::Code) else {
            return Dispatch::Skipped(SkipReason::InFlight);
        };

        info!("Fetching code for {} log line(s)", req.logs.len());
        let pending = PendingRequest::new(&mut self.state, ticket, CODE_RETRY_MESSAGE);
        let outcome = into_outcome(
            self.backend.extract_code(&req).await,
            |resp| resp.into_outcome(),
            CODE_RETRY_MESSAGE,
        );
        let applied = pending.settle(PipelineEvent::CodeCompleted { ticket, outcome });

        self.finish(Stage::Code, applied)
    }

    /// Send the current logs and code to the analysis service
    pub async fn fetch_analysis(&mut self) -> Dispatch {
        if !gate::can_debug(&self.state) {
            warn!("Fetch logs and code first.");
            return Dispatch::Skipped(SkipReason::GateClosed);
        }

        let req = DebugRequest::new(self.state.logs(), self.state.code());

        let Some(ticket) = self.state.begin(Stage::Analysis) else {
            return Dispatch::Skipped(SkipReason::InFlight);
        };

        info!(
            "Requesting analysis for {} log line(s) and {} snippet(s)",
            req.logs.len(),
            req.code.len()
        );
        let pending = PendingRequest::new(&mut self.state, ticket, ANALYSIS_RETRY_MESSAGE);
        let outcome = into_outcome(
            self.backend.diagnose(&req).await,
            |resp| resp.into_outcome(),
            ANALYSIS_RETRY_MESSAGE,
        );
        let applied = pending.settle(PipelineEvent::AnalysisCompleted { ticket, outcome });

        self.finish(Stage::Analysis, applied)
    }

    /// Run stages in order up to and including `through`
    ///
    /// Stops after the first stage that does not complete successfully.
    pub async fn run(&mut self, params: QueryParameters, through: Stage) -> Vec<(Stage, Dispatch)> {
        let mut report = Vec::new();

        let dispatch = self.fetch_logs(params).await;
        report.push((Stage::Logs, dispatch));
        if !dispatch.succeeded() || through == Stage::Logs {
            return report;
        }

        let dispatch = self.fetch_code().await;
        report.push((Stage::Code, dispatch));
        if !dispatch.succeeded() || through == Stage::Code {
            return report;
        }

        let dispatch = self.fetch_analysis().await;
        report.push((Stage::Analysis, dispatch));
        report
    }

    fn finish(&mut self, stage: Stage, applied: bool) -> Dispatch {
        if !applied {
            return Dispatch::Stale;
        }

        let status = self.state.status(stage);
        match self.state.error(stage) {
            Some(msg) => warn!("{} stage failed: {}", stage, msg),
            None => info!("{} stage completed", stage),
        }
        Dispatch::Completed(status)
    }
}

/// A begun request that has not been settled yet
///
/// If the fetch future is dropped mid-call (a caller-side timeout or
/// `select!`), the ticket is settled as a transport failure so the stage
/// does not stay `Loading`.
struct PendingRequest<'a> {
    state: &'a mut PipelineState,
    ticket: RequestTicket,
    retry_message: &'static str,
    settled: bool,
}

impl<'a> PendingRequest<'a> {
    fn new(state: &'a mut PipelineState, ticket: RequestTicket, retry_message: &'static str) -> Self {
        Self {
            state,
            ticket,
            retry_message,
            settled: false,
        }
    }

    /// Apply the completion; returns `false` if it was stale
    fn settle(mut self, event: PipelineEvent) -> bool {
        self.settled = true;
        self.state.complete(event)
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("{} request dropped before it answered", self.ticket.stage());
        self.state.abandon(self.ticket, self.retry_message);
    }
}

/// Collapse a client result into the reducer's tagged outcome
///
/// Backend-reported errors keep their text; every other failure gets the
/// stage's generic retry message.
fn into_outcome<R, T>(
    result: Result<R>,
    convert: impl FnOnce(R) -> StageOutcome<T>,
    retry_message: &str,
) -> StageOutcome<T> {
    match result {
        Ok(response) => convert(response),
        Err(ClientError::Backend(msg)) => StageOutcome::BackendError(msg),
        Err(e) => {
            error!("{}: {}", retry_message, e);
            StageOutcome::TransportError(retry_message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use triage_core::domain::code::CodeSnippet;
    use triage_core::domain::pipeline::{ActiveView, Phase};
    use triage_core::domain::query::{Environment, parse_timestamp};
    use triage_core::dto::code::CodeResponse;
    use triage_core::dto::debug::DebugResponse;
    use triage_core::dto::logs::LogsResponse;

    /// Answers each call from a queue and records what it was sent
    #[derive(Default)]
    struct ScriptedBackend {
        logs: Mutex<VecDeque<Result<LogsResponse>>>,
        code: Mutex<VecDeque<Result<CodeResponse>>>,
        debug: Mutex<VecDeque<Result<DebugResponse>>>,
        log_queries: Mutex<Vec<LogsQuery>>,
        code_requests: Mutex<Vec<CodeRequest>>,
        debug_requests: Mutex<Vec<DebugRequest>>,
    }

    impl ScriptedBackend {
        fn with_logs(self, resp: Result<LogsResponse>) -> Self {
            self.logs.lock().unwrap().push_back(resp);
            self
        }

        fn with_code(self, resp: Result<CodeResponse>) -> Self {
            self.code.lock().unwrap().push_back(resp);
            self
        }

        fn with_debug(self, resp: Result<DebugResponse>) -> Self {
            self.debug.lock().unwrap().push_back(resp);
            self
        }

        fn calls(&self) -> (usize, usize, usize) {
            (
                self.log_queries.lock().unwrap().len(),
                self.code_requests.lock().unwrap().len(),
                self.debug_requests.lock().unwrap().len(),
            )
        }
    }

    #[async_trait]
    impl DebugBackend for ScriptedBackend {
        async fn query_logs(&self, query: &LogsQuery) -> Result<LogsResponse> {
            self.log_queries.lock().unwrap().push(query.clone());
            self.logs
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected logs call")
        }

        async fn extract_code(&self, req: &CodeRequest) -> Result<CodeResponse> {
            self.code_requests.lock().unwrap().push(req.clone());
            self.code
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected code call")
        }

        async fn diagnose(&self, req: &DebugRequest) -> Result<DebugResponse> {
            self.debug_requests.lock().unwrap().push(req.clone());
            self.debug
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected debug call")
        }
    }

    fn params() -> QueryParameters {
        QueryParameters {
            environment: Environment::Production,
            source: "Windstream".to_string(),
            start_time: parse_timestamp("2025-02-10T16:45").unwrap(),
            end_time: parse_timestamp("2025-02-10T16:55").unwrap(),
            error_message: "QueryComposerFactory".to_string(),
        }
    }

    fn logs_ok(lines: &[&str]) -> Result<LogsResponse> {
        Ok(LogsResponse {
            logs: lines.iter().map(|l| (*l).into()).collect(),
            ..Default::default()
        })
    }

    fn code_ok(bodies: &[&str]) -> Result<CodeResponse> {
        Ok(CodeResponse {
            code: bodies.iter().map(|b| CodeSnippet::new("", *b)).collect(),
            error: None,
        })
    }

    #[tokio::test]
    async fn test_fetch_logs_sends_resolved_query() {
        let backend = ScriptedBackend::default().with_logs(logs_ok(&["a"]));
        let mut controller = PipelineController::new(backend);

        let dispatch = controller.fetch_logs(params()).await;
        assert_eq!(dispatch, Dispatch::Completed(StageStatus::Ready));

        let queries = controller.backend().log_queries.lock().unwrap();
        assert_eq!(queries[0].log_group, "/aws/containerinsights/prod/application");
        assert_eq!(queries[0].log_stream, "windstream-aro-service");
        assert_eq!(queries[0].start_time, "2025-02-10T16:45");
        assert_eq!(queries[0].end_time, "2025-02-10T16:55");
        assert_eq!(queries[0].error_message, "QueryComposerFactory");
    }

    #[tokio::test]
    async fn test_fetch_logs_backend_error() {
        let backend = ScriptedBackend::default()
            .with_logs(Ok(LogsResponse {
                code_snippets: vec![CodeSnippet::new("x.py", "...")],
                analysis: Some("old".to_string()),
                ..Default::default()
            }))
            .with_logs(Ok(LogsResponse {
                error: Some("boom".to_string()),
                ..Default::default()
            }));
        let mut controller = PipelineController::new(backend);

        controller.fetch_logs(params()).await;
        let dispatch = controller.fetch_logs(params()).await;

        let state = controller.state();
        assert_eq!(dispatch, Dispatch::Completed(StageStatus::Failed));
        assert!(state.logs().is_empty());
        assert!(state.code().is_empty());
        assert_eq!(state.analysis(), "");
        assert_eq!(state.logs_error(), Some("boom"));
    }

    #[tokio::test]
    async fn test_fetch_logs_transport_failure_uses_retry_message() {
        let backend = ScriptedBackend::default()
            .with_logs(Err(ClientError::ParseError("not json".to_string())));
        let mut controller = PipelineController::new(backend);

        controller.fetch_logs(params()).await;

        assert_eq!(controller.state().logs_error(), Some(LOGS_RETRY_MESSAGE));
        assert_eq!(controller.state().phase(), Phase::LogsFailed);
    }

    #[tokio::test]
    async fn test_error_status_with_error_body_keeps_backend_text() {
        let backend = ScriptedBackend::default()
            .with_logs(Err(ClientError::Backend("log group missing".to_string())));
        let mut controller = PipelineController::new(backend);

        controller.fetch_logs(params()).await;

        assert_eq!(controller.state().logs_error(), Some("log group missing"));
    }

    #[tokio::test]
    async fn test_fetch_logs_with_snippets_shows_code() {
        let backend = ScriptedBackend::default().with_logs(Ok(LogsResponse {
            logs: vec!["a".into(), "b".into()],
            code_snippets: vec![CodeSnippet::new("x.py", "...")],
            ..Default::default()
        }));
        let mut controller = PipelineController::new(backend);

        controller.fetch_logs(params()).await;

        assert_eq!(controller.state().active_view(), ActiveView::Code);
        assert_eq!(controller.state().code().len(), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_source_never_calls_backend() {
        let mut controller = PipelineController::new(ScriptedBackend::default());
        let mut query = params();
        query.source = "   ".to_string();

        let dispatch = controller.fetch_logs(query).await;

        assert_eq!(dispatch, Dispatch::Skipped(SkipReason::GateClosed));
        assert_eq!(controller.backend().calls(), (0, 0, 0));
        assert_eq!(controller.state(), &PipelineState::new());
    }

    #[tokio::test]
    async fn test_unknown_source_passes_through_to_backend() {
        let backend = ScriptedBackend::default().with_logs(logs_ok(&["a"]));
        let mut controller = PipelineController::new(backend);
        let mut query = params();
        query.source = "brand-new-service".to_string();

        controller.fetch_logs(query).await;

        let queries = controller.backend().log_queries.lock().unwrap();
        assert_eq!(queries[0].log_stream, "brand-new-service");
    }

    #[tokio::test]
    async fn test_fetch_code_without_logs_is_a_no_op() {
        let mut controller = PipelineController::new(ScriptedBackend::default());

        let dispatch = controller.fetch_code().await;

        assert_eq!(dispatch, Dispatch::Skipped(SkipReason::GateClosed));
        assert_eq!(controller.backend().calls(), (0, 0, 0));
        assert_eq!(controller.state(), &PipelineState::new());
    }

    #[tokio::test]
    async fn test_fetch_code_sends_full_log_sequence() {
        let backend = ScriptedBackend::default()
            .with_logs(logs_ok(&["first", "second", "third"]))
            .with_code(code_ok(&["class A {}"]));
        let mut controller = PipelineController::new(backend);

        controller.fetch_logs(params()).await;
        let dispatch = controller.fetch_code().await;

        assert!(dispatch.succeeded());
        let requests = controller.backend().code_requests.lock().unwrap();
        let sent: Vec<&str> = requests[0].logs.iter().map(|l| l.as_str()).collect();
        assert_eq!(sent, vec!["first", "second", "third"]);
        assert_eq!(controller.state().active_view(), ActiveView::Code);
    }

    #[tokio::test]
    async fn test_fetch_code_failure_clears_previous_snippets() {
        let backend = ScriptedBackend::default()
            .with_logs(logs_ok(&["a"]))
            .with_code(code_ok(&["class A {}"]))
            .with_code(Ok(CodeResponse {
                code: vec![],
                error: Some("index missing".to_string()),
            }));
        let mut controller = PipelineController::new(backend);

        controller.fetch_logs(params()).await;
        controller.fetch_code().await;
        controller.fetch_code().await;

        assert!(controller.state().code().is_empty());
        assert_eq!(controller.state().code_error(), Some("index missing"));
        assert_eq!(controller.state().logs().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_analysis_requires_code() {
        let backend = ScriptedBackend::default().with_logs(logs_ok(&["a"]));
        let mut controller = PipelineController::new(backend);
        controller.fetch_logs(params()).await;

        let dispatch = controller.fetch_analysis().await;

        assert_eq!(dispatch, Dispatch::Skipped(SkipReason::GateClosed));
        assert_eq!(controller.backend().calls(), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_fetch_analysis_success() {
        let backend = ScriptedBackend::default()
            .with_logs(logs_ok(&["a"]))
            .with_code(code_ok(&["int x;"]))
            .with_debug(Ok(DebugResponse {
                debug_info: Some("root cause: X".to_string()),
                error: None,
            }));
        let mut controller = PipelineController::new(backend);

        controller.fetch_logs(params()).await;
        controller.fetch_code().await;
        controller.fetch_analysis().await;

        let state = controller.state();
        assert_eq!(state.debug_info(), "root cause: X");
        assert_eq!(state.analysis(), "root cause: X");
        assert_eq!(state.active_view(), ActiveView::Analysis);

        let requests = controller.backend().debug_requests.lock().unwrap();
        assert_eq!(requests[0].code, vec!["int x;".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_logs_twice_is_idempotent() {
        let backend = ScriptedBackend::default()
            .with_logs(logs_ok(&["a", "b"]))
            .with_logs(logs_ok(&["a", "b"]));
        let mut controller = PipelineController::new(backend);

        controller.fetch_logs(params()).await;
        let first = controller.state().clone();
        controller.fetch_logs(params()).await;
        let second = controller.state();

        assert_eq!(&first, second);
    }

    /// Never answers the first logs call; answers every later one
    #[derive(Default)]
    struct StallingBackend {
        stalled: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl DebugBackend for StallingBackend {
        async fn query_logs(&self, _query: &LogsQuery) -> Result<LogsResponse> {
            if !self.stalled.swap(true, std::sync::atomic::Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            logs_ok(&["retried"])
        }

        async fn extract_code(&self, _req: &CodeRequest) -> Result<CodeResponse> {
            unimplemented!("code is not exercised")
        }

        async fn diagnose(&self, _req: &DebugRequest) -> Result<DebugResponse> {
            unimplemented!("analysis is not exercised")
        }
    }

    #[tokio::test]
    async fn test_dropped_fetch_does_not_wedge_stage() {
        let mut controller = PipelineController::new(StallingBackend::default());

        let first = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.fetch_logs(params()),
        )
        .await;
        assert!(first.is_err());
        assert_eq!(controller.state().status(Stage::Logs), StageStatus::Failed);
        assert_eq!(controller.state().logs_error(), Some(LOGS_RETRY_MESSAGE));

        let retry = controller.fetch_logs(params()).await;
        assert_eq!(retry, Dispatch::Completed(StageStatus::Ready));
        assert_eq!(controller.state().logs()[0].as_str(), "retried");
    }

    #[tokio::test]
    async fn test_run_through_analysis() {
        let backend = ScriptedBackend::default()
            .with_logs(logs_ok(&["a"]))
            .with_code(code_ok(&["int x;"]))
            .with_debug(Ok(DebugResponse {
                debug_info: Some("fix it".to_string()),
                error: None,
            }));
        let mut controller = PipelineController::new(backend);

        let report = controller.run(params(), Stage::Analysis).await;

        let stages: Vec<Stage> = report.iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, vec![Stage::Logs, Stage::Code, Stage::Analysis]);
        assert!(report.iter().all(|(_, d)| d.succeeded()));
    }

    #[tokio::test]
    async fn test_run_stops_when_logs_are_empty() {
        let backend = ScriptedBackend::default().with_logs(logs_ok(&[]));
        let mut controller = PipelineController::new(backend);

        let report = controller.run(params(), Stage::Analysis).await;

        assert_eq!(
            report,
            vec![
                (Stage::Logs, Dispatch::Completed(StageStatus::Ready)),
                (Stage::Code, Dispatch::Skipped(SkipReason::GateClosed)),
            ]
        );
    }
}
