//! Logs stage DTOs

use serde::{Deserialize, Serialize};

use crate::domain::code::CodeSnippet;
use crate::domain::log::LogEntry;
use crate::domain::pipeline::{LogsPayload, StageOutcome};
use crate::dto::lenient;

/// Query string for `GET /logs`
///
/// All values are backend-facing: the group and stream are already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsQuery {
    pub log_group: String,
    pub log_stream: String,
    pub start_time: String,
    pub end_time: String,
    pub error_message: String,
}

/// Response body of `GET /logs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default, deserialize_with = "lenient::log_lines")]
    pub logs: Vec<LogEntry>,

    #[serde(
        default,
        rename = "codeSnippets",
        deserialize_with = "lenient::snippets",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub code_snippets: Vec<CodeSnippet>,

    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub analysis: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::error_indicator",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

impl LogsResponse {
    pub fn into_outcome(self) -> StageOutcome<LogsPayload> {
        match self.error {
            Some(msg) => StageOutcome::BackendError(msg),
            None => StageOutcome::Success(LogsPayload {
                logs: self.logs,
                code_snippets: self.code_snippets,
                analysis: self.analysis,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_response() {
        let resp: LogsResponse = serde_json::from_value(json!({
            "logs": ["a", "b"],
            "codeSnippets": [{"file": "x.py", "code": "..."}],
            "analysis": "root cause"
        }))
        .unwrap();

        assert_eq!(resp.logs.len(), 2);
        assert_eq!(resp.code_snippets[0].file, "x.py");
        assert_eq!(resp.analysis.as_deref(), Some("root cause"));
        assert!(resp.into_outcome().is_success());
    }

    #[test]
    fn test_malformed_logs_become_empty() {
        let resp: LogsResponse = serde_json::from_value(json!({
            "logs": {"unexpected": true},
            "codeSnippets": "nope",
            "analysis": 7
        }))
        .unwrap();

        assert!(resp.logs.is_empty());
        assert!(resp.code_snippets.is_empty());
        assert!(resp.analysis.is_none());
    }

    #[test]
    fn test_missing_logs_field() {
        let resp: LogsResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp, LogsResponse::default());
    }

    #[test]
    fn test_error_indicator() {
        let resp: LogsResponse = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert_eq!(
            resp.into_outcome(),
            StageOutcome::BackendError("boom".to_string())
        );

        let resp: LogsResponse =
            serde_json::from_value(json!({"logs": ["a"], "error": ""})).unwrap();
        assert!(resp.into_outcome().is_success());

        let resp: LogsResponse =
            serde_json::from_value(json!({"logs": [], "error": null})).unwrap();
        assert!(resp.error.is_none());
    }
}
