//! Time initializer
//!
//! Produces the default query window exactly once, after setup. Until then
//! the time fields count as unset and the logs gate stays closed.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::query::truncate_to_minute;

/// Source of wall-clock readings
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always answers the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Two-phase initialization of the default time window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeInitializer {
    #[default]
    Uninitialized,
    Initialized {
        now: NaiveDateTime,
    },
}

impl TimeInitializer {
    pub fn new() -> Self {
        Self::Uninitialized
    }

    /// Take one reading from `clock`, truncated to the minute
    ///
    /// Only the first call has an effect; later calls return `None`.
    pub fn initialize(&mut self, clock: &dyn Clock) -> Option<NaiveDateTime> {
        if self.is_initialized() {
            tracing::debug!("time initializer already ran, ignoring");
            return None;
        }

        let now = truncate_to_minute(clock.now().naive_utc());
        *self = TimeInitializer::Initialized { now };
        Some(now)
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self, TimeInitializer::Initialized { .. })
    }

    /// The default used for both ends of the window, once available
    pub fn default_time(&self) -> Option<NaiveDateTime> {
        match self {
            TimeInitializer::Uninitialized => None,
            TimeInitializer::Initialized { now } => Some(*now),
        }
    }
}
