//! Log domain types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of log text, as returned by the log service
///
/// Entries are kept in the order the backend sent them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(String);

impl LogEntry {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LogEntry {
    fn from(line: String) -> Self {
        Self(line)
    }
}

impl From<&str> for LogEntry {
    fn from(line: &str) -> Self {
        Self(line.to_string())
    }
}

/// Coerce an arbitrary JSON value into a log sequence
///
/// Anything that is not an array yields an empty sequence. String elements
/// are taken verbatim, other elements keep their JSON text.
pub fn coerce_log_lines(value: Value) -> Vec<LogEntry> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(line) => LogEntry(line),
                other => LogEntry(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    }
}
