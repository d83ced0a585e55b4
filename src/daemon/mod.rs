//! Timer core for Refresh Pomodoro.
//!
//! This module contains the timer machinery:
//! - `scheduler`: Wall clock and the single-slot one-second scheduler
//! - `stats`: Daily focus statistics with day rollover
//! - `meal`: Meal-time reminders
//! - `overlay`: Rest overlay dismissal policy
//! - `timer`: Timer engine with state transitions and countdown logic
//! - `runner`: Interactive event loop driving the engine

pub mod meal;
pub mod overlay;
pub mod runner;
pub mod scheduler;
pub mod stats;
pub mod timer;

pub use meal::{MealAlert, MealAlertLog, MealAlertScheduler, PollOutcome};
pub use overlay::{DismissPolicy, OverlayGate, OverlayView, RestKind};
pub use runner::{handle_command, run, spawn_input_reader, Flow, SessionCommand};
pub use scheduler::{Clock, ManualClock, Scheduler, SystemClock, TaskKind};
pub use stats::StatsAccumulator;
pub use timer::TimerEngine;
