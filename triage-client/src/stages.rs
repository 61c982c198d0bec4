//! Pipeline stage endpoints

use crate::BackendClient;
use crate::error::Result;
use triage_core::dto::code::{CodeRequest, CodeResponse};
use triage_core::dto::debug::{DebugRequest, DebugResponse};
use triage_core::dto::logs::{LogsQuery, LogsResponse};

impl BackendClient {
    // =============================================================================
    // Logs Stage
    // =============================================================================

    /// Retrieve log lines matching a resolved query
    ///
    /// # Arguments
    /// * `query` - Backend-facing log group, stream, window, and error filter
    ///
    /// # Returns
    /// The logs response; a reported `error` field is left in the body
    ///
    /// # Example
    /// ```no_run
    /// # use triage_client::BackendClient;
    /// # use triage_core::dto::logs::LogsQuery;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = BackendClient::new("http://127.0.0.1:8000");
    /// let response = client.fetch_logs(&LogsQuery {
    ///     log_group: "/aws/containerinsights/nonprod/application".to_string(),
    ///     log_stream: "qa_aro-service".to_string(),
    ///     start_time: "2025-02-10T16:45".to_string(),
    ///     end_time: "2025-02-10T16:55".to_string(),
    ///     error_message: "QueryComposerFactory".to_string(),
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_logs(&self, query: &LogsQuery) -> Result<LogsResponse> {
        let url = format!("{}/logs", self.base_url);
        tracing::debug!("GET {} (stream {})", url, query.log_stream);
        let response = self.client.get(&url).query(query).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Code Stage
    // =============================================================================

    /// Ask the backend which source locations the given logs implicate
    pub async fn fetch_code(&self, req: &CodeRequest) -> Result<CodeResponse> {
        let url = format!("{}/code", self.base_url);
        tracing::debug!("POST {} ({} log line(s))", url, req.logs.len());
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Analysis Stage
    // =============================================================================

    /// Request a natural-language diagnosis for logs plus code
    pub async fn fetch_debug_info(&self, req: &DebugRequest) -> Result<DebugResponse> {
        let url = format!("{}/debug", self.base_url);
        tracing::debug!(
            "POST {} ({} log line(s), {} snippet(s))",
            url,
            req.logs.len(),
            req.code.len()
        );
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }
}
