//! Repository-browsing DTOs
//!
//! Shapes for the gateway's pass-through routes. Payload fields are opaque
//! JSON copied from the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query string shared by the repository routes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoQuery {
    pub repo: Option<String>,
}

impl RepoQuery {
    /// The repository name, if one was given and it is not blank
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref().filter(|r| !r.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoSnippets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippets: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoLogs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Value>,
}

/// Error body returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
