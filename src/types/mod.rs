//! Core data types for the Refresh Pomodoro timer.
//!
//! This module defines the data structures used for:
//! - Timer mode and countdown state
//! - User configuration with lazy validation
//! - Daily statistics

mod error;
pub(crate) mod lenient;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use error::{DurationField, TimerError};

// ============================================================================
// Mode
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Initial idle state, nothing has run yet
    Ready,
    /// Currently in a work session
    Work,
    /// Currently in an ordinary rest
    Rest,
    /// Currently in an accepted long rest
    LongRest,
    /// Idle after an explicit stop
    Stopped,
}

impl Mode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ready => "ready",
            Mode::Work => "work",
            Mode::Rest => "rest",
            Mode::LongRest => "long_rest",
            Mode::Stopped => "stopped",
        }
    }

    /// Returns the label shown in the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Ready => "Ready",
            Mode::Work => "Focus",
            Mode::Rest => "Rest",
            Mode::LongRest => "Long rest",
            Mode::Stopped => "Paused",
        }
    }

    /// Returns true while a session is in progress.
    pub fn is_running(&self) -> bool {
        matches!(self, Mode::Work | Mode::Rest | Mode::LongRest)
    }

    /// Returns true for the two idle states.
    pub fn is_idle(&self) -> bool {
        !self.is_running()
    }

    /// Returns true during either kind of rest.
    pub fn is_rest(&self) -> bool {
        matches!(self, Mode::Rest | Mode::LongRest)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Ready
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// NumericSetting
// ============================================================================

/// Longest accepted duration, in minutes
pub const MAX_MINUTES: u32 = u32::MAX / 60;

/// A numeric setting kept exactly as the user entered it.
///
/// Values are validated when a transition needs them, so a bad edit blocks
/// that transition instead of being replaced by a silent default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSetting", into = "RawSetting")]
pub struct NumericSetting(String);

impl NumericSetting {
    /// Wraps raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the value as a positive whole number.
    ///
    /// Minute fields are also capped at [`MAX_MINUTES`] so their length in
    /// seconds fits the countdown.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` naming `field` when the text is not an
    /// integer, is not greater than zero, or is out of range.
    pub fn positive(&self, field: DurationField) -> Result<u32, TimerError> {
        let limit = match field {
            DurationField::LongRestEveryNCycles => u32::MAX,
            _ => MAX_MINUTES,
        };
        match self.0.trim().parse::<u32>() {
            Ok(value) if value > 0 && value <= limit => Ok(value),
            _ => Err(TimerError::invalid_duration(field, &self.0)),
        }
    }
}

impl From<u32> for NumericSetting {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for NumericSetting {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for NumericSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire form of a numeric setting: a JSON number or a string.
///
/// Any other JSON value (a fraction, a boolean, null) is kept as its text
/// so validation can name it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSetting {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawSetting> for NumericSetting {
    fn from(raw: RawSetting) -> Self {
        match raw {
            RawSetting::Number(n) => Self(n.to_string()),
            RawSetting::Text(s) => Self(s),
            RawSetting::Other(value) => Self(value.to_string()),
        }
    }
}

impl From<NumericSetting> for RawSetting {
    fn from(setting: NumericSetting) -> Self {
        match setting.0.trim().parse::<i64>() {
            Ok(n) => RawSetting::Number(n),
            Err(_) => RawSetting::Text(setting.0),
        }
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

fn default_work_minutes() -> NumericSetting {
    NumericSetting::from(25)
}

fn default_rest_minutes() -> NumericSetting {
    NumericSetting::from(5)
}

fn default_long_rest_every_n_cycles() -> NumericSetting {
    NumericSetting::from(4)
}

fn default_long_rest_minutes() -> NumericSetting {
    NumericSetting::from(15)
}

fn default_true() -> bool {
    true
}

/// Default meal reminders.
pub fn default_meal_times() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("lunch".to_string(), "12:00".to_string()),
        ("dinner".to_string(), "17:30".to_string()),
    ])
}

/// Validated long-rest parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongRestPlan {
    /// Offer a long rest every this many completed cycles
    pub every_n_cycles: u32,
    /// Long rest length in minutes
    pub minutes: u32,
}

/// Configuration for the timer.
///
/// Every key falls back to its default on its own, so partial settings
/// files are valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    /// Work duration in minutes
    #[serde(default = "default_work_minutes")]
    pub work_minutes: NumericSetting,
    /// Rest duration in minutes
    #[serde(default = "default_rest_minutes")]
    pub rest_minutes: NumericSetting,
    /// Lock the rest overlay until the countdown ends
    #[serde(default = "default_true", deserialize_with = "lenient::toggle")]
    pub force_rest: bool,
    /// Whether meal reminders fire
    #[serde(default = "default_true", deserialize_with = "lenient::toggle")]
    pub meal_alert_enabled: bool,
    /// Meal name to HH:MM
    #[serde(default = "default_meal_times", deserialize_with = "lenient::meal_times")]
    pub meal_times: BTreeMap<String, String>,
    /// Whether long rests are offered
    #[serde(default = "default_true", deserialize_with = "lenient::toggle")]
    pub long_rest_enabled: bool,
    /// Completed cycles between long-rest offers
    #[serde(default = "default_long_rest_every_n_cycles")]
    pub long_rest_every_n_cycles: NumericSetting,
    /// Long rest duration in minutes
    #[serde(default = "default_long_rest_minutes")]
    pub long_rest_minutes: NumericSetting,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            rest_minutes: default_rest_minutes(),
            force_rest: true,
            meal_alert_enabled: true,
            meal_times: default_meal_times(),
            long_rest_enabled: true,
            long_rest_every_n_cycles: default_long_rest_every_n_cycles(),
            long_rest_minutes: default_long_rest_minutes(),
        }
    }
}

impl TimerConfig {
    /// Sets the work duration.
    pub fn with_work_minutes(mut self, minutes: impl Into<NumericSetting>) -> Self {
        self.work_minutes = minutes.into();
        self
    }

    /// Sets the rest duration.
    pub fn with_rest_minutes(mut self, minutes: impl Into<NumericSetting>) -> Self {
        self.rest_minutes = minutes.into();
        self
    }

    /// Sets the forced-rest policy.
    pub fn with_force_rest(mut self, force_rest: bool) -> Self {
        self.force_rest = force_rest;
        self
    }

    /// Enables long rests with the given cadence and length.
    pub fn with_long_rest(mut self, every_n_cycles: u32, minutes: u32) -> Self {
        self.long_rest_enabled = true;
        self.long_rest_every_n_cycles = every_n_cycles.into();
        self.long_rest_minutes = minutes.into();
        self
    }

    /// Disables long-rest offers.
    pub fn without_long_rest(mut self) -> Self {
        self.long_rest_enabled = false;
        self
    }

    /// Validated work duration in minutes.
    pub fn work_minutes(&self) -> Result<u32, TimerError> {
        self.work_minutes.positive(DurationField::WorkMinutes)
    }

    /// Validated rest duration in minutes.
    pub fn rest_minutes(&self) -> Result<u32, TimerError> {
        self.rest_minutes.positive(DurationField::RestMinutes)
    }

    /// Validated long-rest parameters, whether or not long rest is enabled.
    pub fn long_rest_plan(&self) -> Result<LongRestPlan, TimerError> {
        Ok(LongRestPlan {
            every_n_cycles: self
                .long_rest_every_n_cycles
                .positive(DurationField::LongRestEveryNCycles)?,
            minutes: self
                .long_rest_minutes
                .positive(DurationField::LongRestMinutes)?,
        })
    }

    /// Checks everything `start` depends on.
    ///
    /// # Errors
    ///
    /// Returns the first invalid duration, work before rest before long rest.
    pub fn validate_for_start(&self) -> Result<(), TimerError> {
        self.work_minutes()?;
        self.rest_minutes()?;
        if self.long_rest_enabled {
            self.long_rest_plan()?;
        }
        Ok(())
    }

    /// Applies a single edit.
    ///
    /// Durations are stored verbatim and checked at the next transition;
    /// toggles must parse as booleans.
    pub fn apply(&mut self, key: &SettingKey, value: &str) -> Result<(), TimerError> {
        let invalid = || TimerError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            SettingKey::WorkMinutes => self.work_minutes = NumericSetting::new(value),
            SettingKey::RestMinutes => self.rest_minutes = NumericSetting::new(value),
            SettingKey::LongRestEveryNCycles => {
                self.long_rest_every_n_cycles = NumericSetting::new(value)
            }
            SettingKey::LongRestMinutes => self.long_rest_minutes = NumericSetting::new(value),
            SettingKey::ForceRest => self.force_rest = parse_toggle(value).ok_or_else(invalid)?,
            SettingKey::MealAlertEnabled => {
                self.meal_alert_enabled = parse_toggle(value).ok_or_else(invalid)?
            }
            SettingKey::LongRestEnabled => {
                self.long_rest_enabled = parse_toggle(value).ok_or_else(invalid)?
            }
            SettingKey::MealTime(meal) => {
                self.meal_times.insert(meal.clone(), value.trim().to_string());
            }
        }
        Ok(())
    }
}

fn parse_toggle(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

// ============================================================================
// SettingKey
// ============================================================================

/// An editable setting, addressed by its persisted key or a short alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKey {
    WorkMinutes,
    RestMinutes,
    ForceRest,
    MealAlertEnabled,
    LongRestEnabled,
    LongRestEveryNCycles,
    LongRestMinutes,
    /// `meal.<name>`
    MealTime(String),
}

impl SettingKey {
    /// Returns true for settings the running countdown depends on.
    pub fn is_duration(&self) -> bool {
        matches!(
            self,
            SettingKey::WorkMinutes
                | SettingKey::RestMinutes
                | SettingKey::LongRestEveryNCycles
                | SettingKey::LongRestMinutes
        )
    }
}

impl FromStr for SettingKey {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some(meal) = key.strip_prefix("meal.") {
            if !meal.is_empty() {
                return Ok(SettingKey::MealTime(meal.to_string()));
            }
        }
        match key {
            "work" | "workMinutes" => Ok(SettingKey::WorkMinutes),
            "rest" | "restMinutes" => Ok(SettingKey::RestMinutes),
            "force-rest" | "forceRest" => Ok(SettingKey::ForceRest),
            "meal-alert" | "mealAlertEnabled" => Ok(SettingKey::MealAlertEnabled),
            "long-rest" | "longRestEnabled" => Ok(SettingKey::LongRestEnabled),
            "long-rest-every" | "longRestEveryNCycles" => Ok(SettingKey::LongRestEveryNCycles),
            "long-rest-minutes" | "longRestMinutes" => Ok(SettingKey::LongRestMinutes),
            _ => Err(TimerError::InvalidSetting {
                key: key.to_string(),
                value: String::new(),
            }),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingKey::WorkMinutes => f.write_str("workMinutes"),
            SettingKey::RestMinutes => f.write_str("restMinutes"),
            SettingKey::ForceRest => f.write_str("forceRest"),
            SettingKey::MealAlertEnabled => f.write_str("mealAlertEnabled"),
            SettingKey::LongRestEnabled => f.write_str("longRestEnabled"),
            SettingKey::LongRestEveryNCycles => f.write_str("longRestEveryNCycles"),
            SettingKey::LongRestMinutes => f.write_str("longRestMinutes"),
            SettingKey::MealTime(meal) => write!(f, "meal.{meal}"),
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current mode
    pub mode: Mode,
    /// Remaining seconds in the current period
    pub remaining_seconds: u32,
    /// Work seconds accrued in the in-progress work session
    pub session_work_seconds: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    /// Creates a new TimerState in the ready state.
    pub fn new() -> Self {
        Self {
            mode: Mode::Ready,
            remaining_seconds: 0,
            session_work_seconds: 0,
        }
    }

    /// Starts a work session of the given length.
    pub fn begin_work(&mut self, minutes: u32) {
        self.mode = Mode::Work;
        self.remaining_seconds = minutes.saturating_mul(60);
        self.session_work_seconds = 0;
    }

    /// Starts a rest (ordinary or long) of the given length.
    pub fn begin_rest(&mut self, long: bool, minutes: u32) {
        self.mode = if long { Mode::LongRest } else { Mode::Rest };
        self.remaining_seconds = minutes.saturating_mul(60);
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true once the countdown has reached zero.
    pub fn countdown(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }

    /// Takes the accrued work seconds, leaving zero behind.
    pub fn take_session_work(&mut self) -> u32 {
        std::mem::take(&mut self.session_work_seconds)
    }

    /// Moves to the stopped state.
    pub fn stop(&mut self) {
        self.mode = Mode::Stopped;
        self.remaining_seconds = 0;
        self.session_work_seconds = 0;
    }
}

// ============================================================================
// DailyStats
// ============================================================================

/// Today's focus statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Calendar date these counters belong to
    pub date: NaiveDate,
    /// Cumulative focused seconds
    pub total_work_seconds: u64,
    /// Completed work cycles
    pub completed_cycles: u32,
}

impl DailyStats {
    /// Creates zeroed stats for the given date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_work_seconds: 0,
            completed_cycles: 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
