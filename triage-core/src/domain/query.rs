//! Query domain types

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minute-precision timestamp format used by the console and the backend
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Errors raised when parsing user-facing values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown environment '{0}' (expected production or non-production)")]
    UnknownEnvironment(String),

    #[error("invalid timestamp '{0}' (expected YYYY-MM-DDTHH:MM)")]
    InvalidTimestamp(String),

    #[error("unknown view '{0}' (expected logs, code or analysis)")]
    UnknownView(String),
}

/// Deployment environment a log query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    Production,
    NonProduction,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Production, Environment::NonProduction];

    /// User-facing name, also the key the resolver understands
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::NonProduction => "non-production",
        }
    }

    /// Sources selectable under this environment
    pub fn sources(&self) -> &'static [&'static str] {
        match self {
            Environment::Production => &["Windstream", "Consolidated", "JSI", "123net"],
            Environment::NonProduction => &["QA", "UAT"],
        }
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.sources().contains(&source)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "non-production" | "nonprod" | "non-prod" => Ok(Environment::NonProduction),
            _ => Err(ParseError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// A complete, user-facing log query
///
/// Built by the form layer and handed to the controller by value. The
/// controller never keeps it once the logs stage has been dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    pub environment: Environment,
    pub source: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub error_message: String,
}

/// Drop seconds and sub-second precision
pub fn truncate_to_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Parse a `YYYY-MM-DDTHH:MM` timestamp (seconds are accepted and dropped)
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = input.trim();
    NaiveDateTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .map(truncate_to_minute)
        .map_err(|_| ParseError::InvalidTimestamp(input.to_string()))
}

pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
