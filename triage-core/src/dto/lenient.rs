//! Forgiving field deserializers for backend responses

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::code::CodeSnippet;
use crate::domain::log::{LogEntry, coerce_log_lines};

pub(crate) fn log_lines<'de, D>(deserializer: D) -> Result<Vec<LogEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_log_lines(Value::deserialize(deserializer)?))
}

/// Keep the elements that look like snippets, drop the rest
pub(crate) fn snippets<'de, D>(deserializer: D) -> Result<Vec<CodeSnippet>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Strings pass through, anything else reads as absent
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// An error indicator counts when it is truthy; `null`, `false`, `0` and `""` do not
pub(crate) fn error_indicator<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
