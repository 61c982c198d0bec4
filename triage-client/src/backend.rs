//! Backend seam
//!
//! The controller talks to the diagnosis backend through this trait so the
//! pipeline can be driven by an in-memory fake in tests.

use async_trait::async_trait;
use triage_core::dto::code::{CodeRequest, CodeResponse};
use triage_core::dto::debug::{DebugRequest, DebugResponse};
use triage_core::dto::logs::{LogsQuery, LogsResponse};

use crate::BackendClient;
use crate::error::Result;

/// The three external services the pipeline depends on
#[async_trait]
pub trait DebugBackend: Send + Sync {
    /// Log retrieval
    async fn query_logs(&self, query: &LogsQuery) -> Result<LogsResponse>;

    /// Code-location extraction
    async fn extract_code(&self, req: &CodeRequest) -> Result<CodeResponse>;

    /// Natural-language analysis
    async fn diagnose(&self, req: &DebugRequest) -> Result<DebugResponse>;
}

#[async_trait]
impl DebugBackend for BackendClient {
    async fn query_logs(&self, query: &LogsQuery) -> Result<LogsResponse> {
        self.fetch_logs(query).await
    }

    async fn extract_code(&self, req: &CodeRequest) -> Result<CodeResponse> {
        self.fetch_code(req).await
    }

    async fn diagnose(&self, req: &DebugRequest) -> Result<DebugResponse> {
        self.fetch_debug_info(req).await
    }
}
