//! Timer error types.
//!
//! Three failure families matter to the timer:
//! - invalid durations, which abort the attempted transition
//! - unparseable meal times, which only skip that meal for one poll
//! - persistence failures, which are logged and otherwise ignored

use std::fmt;

use thiserror::Error;

/// A numeric setting that must be a positive whole number before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationField {
    /// Length of a work session in minutes
    WorkMinutes,
    /// Length of an ordinary rest in minutes
    RestMinutes,
    /// Number of completed cycles between long-rest offers
    LongRestEveryNCycles,
    /// Length of a long rest in minutes
    LongRestMinutes,
}

impl DurationField {
    /// Returns the persisted key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            DurationField::WorkMinutes => "workMinutes",
            DurationField::RestMinutes => "restMinutes",
            DurationField::LongRestEveryNCycles => "longRestEveryNCycles",
            DurationField::LongRestMinutes => "longRestMinutes",
        }
    }

    /// Returns the label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            DurationField::WorkMinutes => "Work time",
            DurationField::RestMinutes => "Rest time",
            DurationField::LongRestEveryNCycles => "Long rest cycle count",
            DurationField::LongRestMinutes => "Long rest time",
        }
    }
}

impl fmt::Display for DurationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised by the timer core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A duration or count is not a positive whole number.
    #[error("{field} must be a whole number greater than 0 (got '{value}')")]
    InvalidDuration {
        /// The offending setting
        field: DurationField,
        /// The raw value as entered
        value: String,
    },

    /// A meal time does not parse as HH:MM.
    #[error("{meal} time must use the HH:MM format, e.g. 12:30 (got '{value}')")]
    InvalidTimeFormat {
        /// Meal name
        meal: String,
        /// The raw value as entered
        value: String,
    },

    /// Settings could not be read or written.
    #[error("settings could not be saved: {0}")]
    PersistenceFailure(String),

    /// A start was requested while a session is in progress.
    #[error("the timer is already running")]
    AlreadyRunning,

    /// An operation needs a running session.
    #[error("the timer is not running")]
    NotRunning,

    /// Unknown setting key or a value of the wrong kind.
    #[error("cannot set '{key}' to '{value}'")]
    InvalidSetting {
        /// Setting key as typed
        key: String,
        /// Value as typed
        value: String,
    },
}

impl TimerError {
    /// Builds an `InvalidDuration` for the given field and raw value.
    pub fn invalid_duration(field: DurationField, value: impl Into<String>) -> Self {
        Self::InvalidDuration {
            field,
            value: value.into(),
        }
    }

    /// Returns true if this error is an invalid duration.
    #[must_use]
    pub fn is_invalid_duration(&self) -> bool {
        matches!(self, Self::InvalidDuration { .. })
    }

    /// Returns the offending field for duration errors.
    #[must_use]
    pub fn duration_field(&self) -> Option<DurationField> {
        match self {
            Self::InvalidDuration { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Returns true if the running timer may carry on after this error.
    ///
    /// Invalid durations stop the timer; everything else is local.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !self.is_invalid_duration()
    }

    /// Returns a user-facing hint for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } => "Fix the value in the settings and start the timer again",
            Self::InvalidTimeFormat { .. } => "Enter the meal time as HH:MM",
            Self::PersistenceFailure(_) => "Check that the settings directory is writable",
            Self::AlreadyRunning => "Stop the timer first",
            Self::NotRunning => "Start the timer first",
            Self::InvalidSetting { .. } => "Run `config show` to list the available settings",
        }
    }
}
