//! Command definitions for the Refresh Pomodoro CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::types::SettingKey;

// ============================================================================
// CLI Structure
// ============================================================================

/// Refresh Pomodoro - a focus timer that makes you take your breaks
#[derive(Parser, Debug)]
#[command(
    name = "refresh-pomodoro",
    version,
    about = "Pomodoro focus timer with enforced rests and meal reminders",
    long_about = "A terminal pomodoro timer.\n\
                  Alternates focus sessions and rests, can lock you out of work \
                  until a rest ends, suggests a long rest every few cycles, \
                  and reminds you when it is time to eat.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Show today's focus statistics
    Stats,

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,

    /// Change one setting
    Set {
        /// Setting key (e.g. work, rest, force-rest, long-rest-every, meal.lunch)
        #[arg(value_parser = parse_setting_key)]
        key: SettingKey,

        /// New value
        value: String,
    },

    /// Restore the default settings (today's stats are kept)
    Reset,
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work duration in minutes, saved as the new default
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub work: Option<u32>,

    /// Rest duration in minutes, saved as the new default
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub rest: Option<u32>,

    /// Lock the screen until each rest ends
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "no_force_rest")]
    pub force_rest: bool,

    /// Allow rests to be dismissed early
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_force_rest: bool,

    /// Start the first focus session immediately
    #[arg(short, long)]
    pub start: bool,
}

impl RunArgs {
    /// Returns the setting edits these arguments ask for.
    pub fn overrides(&self) -> Vec<(SettingKey, String)> {
        let mut edits = Vec::new();
        if let Some(work) = self.work {
            edits.push((SettingKey::WorkMinutes, work.to_string()));
        }
        if let Some(rest) = self.rest {
            edits.push((SettingKey::RestMinutes, rest.to_string()));
        }
        if self.force_rest {
            edits.push((SettingKey::ForceRest, "true".to_string()));
        } else if self.no_force_rest {
            edits.push((SettingKey::ForceRest, "false".to_string()));
        }
        edits
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a setting key.
fn parse_setting_key(s: &str) -> Result<SettingKey, String> {
    s.parse::<SettingKey>().map_err(|_| {
        format!(
            "unknown setting '{s}' (expected one of: work, rest, force-rest, meal-alert, \
             long-rest, long-rest-every, long-rest-minutes, meal.<name>)"
        )
    })
}

// ============================================================================
// Tests
// ============================================================================
