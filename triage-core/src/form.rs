//! Query form
//!
//! The input layer: holds the user's in-progress selections and produces
//! [`QueryParameters`] once everything the logs stage needs is present.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::clock::{Clock, TimeInitializer};
use crate::domain::query::{Environment, ParseError, QueryParameters, parse_timestamp};

/// Rejected form edits
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("choose an environment before picking a source")]
    NoEnvironment,

    #[error("'{name}' is not a {environment} source (expected one of: {})", .environment.sources().join(", "))]
    UnknownSource {
        environment: Environment,
        name: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// User selections for one log query
#[derive(Debug, Clone, Default)]
pub struct QueryForm {
    environment: Option<Environment>,
    source: Option<String>,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    error_message: String,
    time: TimeInitializer,
}

impl QueryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill unset time fields from a single clock reading
    ///
    /// Runs once; returns whether this call performed the initialization.
    pub fn initialize_time(&mut self, clock: &dyn Clock) -> bool {
        let Some(now) = self.time.initialize(clock) else {
            return false;
        };
        self.start_time.get_or_insert(now);
        self.end_time.get_or_insert(now);
        true
    }

    pub fn is_time_initialized(&self) -> bool {
        self.time.is_initialized()
    }

    /// Select an environment; a different environment unsets the source
    pub fn set_environment(&mut self, environment: Environment) {
        if self.environment != Some(environment) {
            if let Some(stale) = self.source.take() {
                tracing::debug!("environment changed, clearing source {}", stale);
            }
            self.environment = Some(environment);
        }
    }

    pub fn set_source(&mut self, source: &str) -> Result<(), FormError> {
        let environment = self.environment.ok_or(FormError::NoEnvironment)?;
        let source = source.trim();
        if !environment.has_source(source) {
            return Err(FormError::UnknownSource {
                environment,
                name: source.to_string(),
            });
        }
        self.source = Some(source.to_string());
        Ok(())
    }

    pub fn set_start_time(&mut self, input: &str) -> Result<(), FormError> {
        self.start_time = Some(parse_timestamp(input)?);
        Ok(())
    }

    pub fn set_end_time(&mut self, input: &str) -> Result<(), FormError> {
        self.end_time = Some(parse_timestamp(input)?);
        Ok(())
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.error_message = message.into();
    }

    pub fn environment(&self) -> Option<Environment> {
        self.environment
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Start of the window; unset until the time initializer has run
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time.filter(|_| self.time.is_initialized())
    }

    /// End of the window; unset until the time initializer has run
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time.filter(|_| self.time.is_initialized())
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Names of the fields still blocking the logs stage
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.environment.is_none() {
            missing.push("environment");
        }
        if self.source.is_none() {
            missing.push("source");
        }
        if self.start_time().is_none() {
            missing.push("start time");
        }
        if self.end_time().is_none() {
            missing.push("end time");
        }
        if self.error_message.trim().is_empty() {
            missing.push("error message");
        }
        missing
    }

    /// Snapshot the form as query parameters, if it is complete
    pub fn parameters(&self) -> Option<QueryParameters> {
        Some(QueryParameters {
            environment: self.environment?,
            source: self.source.clone()?,
            start_time: self.start_time()?,
            end_time: self.end_time()?,
            error_message: Some(self.error_message.trim())
                .filter(|m| !m.is_empty())?
                .to_string(),
        })
    }
}
