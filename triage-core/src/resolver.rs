//! Parameter resolver
//!
//! Maps user-facing selections to the identifiers the log backend expects.
//! Pure lookups with no side effects.

use crate::domain::query::QueryParameters;

/// Backend log group for a user-facing environment name
///
/// Returns `None` when the environment is not known; callers must not issue
/// a request without a group.
pub fn resolve_log_group(environment: &str) -> Option<&'static str> {
    match environment {
        "production" => Some("/aws/containerinsights/prod/application"),
        "non-production" => Some("/aws/containerinsights/nonprod/application"),
        _ => None,
    }
}

/// Backend stream name for a user-facing source
///
/// Unknown sources pass through unchanged so new streams work without a
/// code change.
pub fn resolve_log_source(source: &str) -> &str {
    match source {
        "QA" => "qa_aro-service",
        "UAT" => "uat_aro-service",
        "Windstream" => "windstream-aro-service",
        "Consolidated" => "consolidated-aro-service",
        "JSI" => "jsi-aro-service",
        "123net" => "123net-aro-service",
        other => other,
    }
}

/// Backend-facing identifiers for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub log_group: &'static str,
    pub log_stream: String,
}

/// Resolve both identifiers, or `None` if either is unresolvable
pub fn resolve_target(params: &QueryParameters) -> Option<ResolvedTarget> {
    let log_group = resolve_log_group(params.environment.as_str())?;
    let log_stream = resolve_log_source(params.source.trim());
    if log_stream.is_empty() {
        return None;
    }

    Some(ResolvedTarget {
        log_group,
        log_stream: log_stream.to_string(),
    })
}
