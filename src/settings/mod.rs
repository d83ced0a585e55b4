//! Settings persistence.
//!
//! The settings file stores the timer configuration together with today's
//! statistics. Loading never fails: a missing or corrupt file yields the
//! built-in defaults, a mistyped value only affects its own key, and stats
//! saved on another day are discarded.
//! Saving is best-effort and reports failures as `PersistenceFailure`.

mod store;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{lenient, DailyStats, TimerConfig, TimerError};

pub use store::{default_settings_path, JsonSettingsStore, MemorySettingsStore};

/// Settings directory name under the platform config directory
pub const APP_DIR_NAME: &str = "RefreshPomodoro";

/// Settings file name
pub const SETTINGS_FILENAME: &str = "refresh_pomodoro_settings.json";

// ============================================================================
// SettingsFile
// ============================================================================

/// On-disk representation of the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsFile {
    #[serde(flatten)]
    pub config: TimerConfig,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub total_work_seconds: u64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub completed_cycles: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub last_saved_date: Option<NaiveDate>,
}

impl SettingsFile {
    /// Builds the document for a save on `today`.
    pub fn new(config: &TimerConfig, stats: &DailyStats, today: NaiveDate) -> Self {
        Self {
            config: config.clone(),
            total_work_seconds: stats.total_work_seconds,
            completed_cycles: stats.completed_cycles,
            last_saved_date: Some(today),
        }
    }

    /// Splits the document into configuration and today's stats.
    ///
    /// Stats saved on any other date are replaced with zeroes.
    pub fn into_settings(self, today: NaiveDate) -> Settings {
        let stats = if self.last_saved_date == Some(today) {
            DailyStats {
                date: today,
                total_work_seconds: self.total_work_seconds,
                completed_cycles: self.completed_cycles,
            }
        } else {
            DailyStats::new(today)
        };
        Settings {
            config: self.config,
            stats,
        }
    }
}

// ============================================================================
// Settings / SettingsStore
// ============================================================================

/// Loaded settings: configuration plus today's stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config: TimerConfig,
    pub stats: DailyStats,
}

impl Settings {
    /// Built-in defaults with zeroed stats for `today`.
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            config: TimerConfig::default(),
            stats: DailyStats::new(today),
        }
    }
}

/// Load/save contract for the settings file.
pub trait SettingsStore {
    /// Returns the saved settings, or defaults if none can be read.
    fn load(&self, today: NaiveDate) -> Settings;

    /// Saves the configuration and stats as of `today`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the settings cannot be written.
    fn save(
        &self,
        config: &TimerConfig,
        stats: &DailyStats,
        today: NaiveDate,
    ) -> Result<(), TimerError>;
}
