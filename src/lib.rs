//! Refresh Pomodoro Library
//!
//! This library provides the core functionality for the Refresh Pomodoro CLI.
//! It includes:
//! - Timer engine for work/rest cycles with enforced rest overlays
//! - Long-rest offers, meal reminders and daily focus statistics
//! - Settings persistence in a JSON file
//! - Terminal UI and the interactive session loop
//! - CLI command parsing and display utilities

pub mod cli;
pub mod daemon;
pub mod settings;
pub mod types;
pub mod ui;

// Re-export commonly used types for convenience
pub use types::{
    DailyStats, DurationField, Mode, NumericSetting, SettingKey, TimerConfig, TimerError,
    TimerState,
};

// Re-export the timer core
pub use daemon::{
    Clock, DismissPolicy, ManualClock, MealAlertScheduler, OverlayGate, Scheduler,
    StatsAccumulator, SystemClock, TimerEngine,
};

// Re-export settings and UI seams
pub use settings::{JsonSettingsStore, MemorySettingsStore, Settings, SettingsFile, SettingsStore};
pub use ui::{Frame, RecordingUi, TerminalUi, UiBoundary};
