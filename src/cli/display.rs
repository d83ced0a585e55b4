//! Display utilities for the Refresh Pomodoro CLI.
//!
//! This module provides formatted output for:
//! - Settings listing
//! - Today's statistics
//! - Success and error messages

use std::path::Path;

use crate::settings::Settings;
use crate::types::{DailyStats, SettingKey, TimerConfig, TimerError};
use crate::ui::format_focus_time;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the settings and where they are stored.
    pub fn show_config(settings: &Settings, path: &Path) {
        println!("Settings ({})", path.display());
        println!("─────────────────────────────");
        for line in Self::config_lines(&settings.config) {
            println!("{}", line);
        }
    }

    /// Shows today's focus statistics.
    pub fn show_stats(stats: &DailyStats) {
        for line in Self::stats_lines(stats) {
            println!("{}", line);
        }
    }

    /// Shows a success message for a setting change.
    pub fn show_setting_updated(key: &SettingKey, value: &str) {
        println!("* {} = {}", key, value);
    }

    /// Shows a success message for a settings reset.
    pub fn show_reset_success() {
        println!("* Settings restored to defaults");
    }

    /// Shows a warning about a value the timer will refuse to use.
    pub fn show_validation_warning(err: &TimerError) {
        eprintln!("Warning: {}", err);
        eprintln!("  {}", err.suggestion());
    }

    /// Shows the hint printed when an interactive session begins.
    pub fn show_session_banner() {
        println!("Refresh Pomodoro - type 'help' for commands, 'quit' to exit");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// One line per setting, keyed by its persisted name.
    pub fn config_lines(config: &TimerConfig) -> Vec<String> {
        let mut lines = vec![
            format!("workMinutes:          {}", config.work_minutes),
            format!("restMinutes:          {}", config.rest_minutes),
            format!("forceRest:            {}", Self::on_off(config.force_rest)),
            format!("longRestEnabled:      {}", Self::on_off(config.long_rest_enabled)),
            format!("longRestEveryNCycles: {}", config.long_rest_every_n_cycles),
            format!("longRestMinutes:      {}", config.long_rest_minutes),
            format!("mealAlertEnabled:     {}", Self::on_off(config.meal_alert_enabled)),
        ];
        if config.meal_times.is_empty() {
            lines.push("mealTimes:            (none)".to_string());
        } else {
            lines.push("mealTimes:".to_string());
            for (meal, time) in &config.meal_times {
                lines.push(format!("  {}: {}", meal, time));
            }
        }
        lines
    }

    /// Today's stats as display lines.
    pub fn stats_lines(stats: &DailyStats) -> Vec<String> {
        vec![
            format!("Today ({})", stats.date),
            format!("  Focus time: {}", format_focus_time(stats.total_work_seconds)),
            format!("  Pomodoros:  {}", stats.completed_cycles),
        ]
    }

    fn on_off(value: bool) -> &'static str {
        if value {
            "on"
        } else {
            "off"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
