//! Code stage DTOs

use serde::{Deserialize, Serialize};

use crate::domain::code::CodeSnippet;
use crate::domain::log::LogEntry;
use crate::domain::pipeline::StageOutcome;
use crate::dto::lenient;

/// Request body of `POST /code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRequest {
    pub logs: Vec<LogEntry>,
}

/// Response body of `POST /code`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeResponse {
    #[serde(default, deserialize_with = "lenient::snippets")]
    pub code: Vec<CodeSnippet>,

    #[serde(
        default,
        deserialize_with = "lenient::error_indicator",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

impl CodeResponse {
    pub fn into_outcome(self) -> StageOutcome<Vec<CodeSnippet>> {
        match self.error {
            Some(msg) => StageOutcome::BackendError(msg),
            None => StageOutcome::Success(self.code),
        }
    }
}
