//! Analysis stage DTOs

use serde::{Deserialize, Serialize};

use crate::domain::code::CodeSnippet;
use crate::domain::log::LogEntry;
use crate::domain::pipeline::StageOutcome;
use crate::dto::lenient;

/// Request body of `POST /debug`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRequest {
    pub logs: Vec<LogEntry>,
    pub code: Vec<String>,
}

impl DebugRequest {
    /// The backend only wants snippet bodies
    pub fn new(logs: &[LogEntry], snippets: &[CodeSnippet]) -> Self {
        Self {
            logs: logs.to_vec(),
            code: snippets.iter().map(|s| s.code.clone()).collect(),
        }
    }
}

/// Response body of `POST /debug`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugResponse {
    #[serde(default, deserialize_with = "lenient::text")]
    pub debug_info: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::error_indicator",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

impl DebugResponse {
    pub fn into_outcome(self) -> StageOutcome<String> {
        match self.error {
            Some(msg) => StageOutcome::BackendError(msg),
            None => StageOutcome::Success(self.debug_info.unwrap_or_default()),
        }
    }
}
