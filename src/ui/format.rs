//! Text formatting for the timer display.
//!
//! The formatting logic is terminal-independent and fully testable.

use crate::types::{DailyStats, Mode};

use super::Frame;

/// Emoji for a work session
const WORK_EMOJI: &str = "🔥";

/// Emoji for a rest
const REST_EMOJI: &str = "🧘";

/// Emoji for a long rest
const LONG_REST_EMOJI: &str = "😌";

/// Emoji for idle states
const IDLE_EMOJI: &str = "⏸";

/// Formats seconds as `MM:SS`.
pub fn format_clock(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Formats today's focus time.
///
/// - Under a minute: `45s`
/// - Under an hour: `25m`
/// - Otherwise: `1h 5m`
pub fn format_focus_time(total_seconds: u64) -> String {
    let total_minutes = total_seconds / 60;
    if total_minutes == 0 && total_seconds > 0 {
        format!("{}s", total_seconds)
    } else if total_minutes < 60 {
        format!("{}m", total_minutes)
    } else {
        format!("{}h {}m", total_minutes / 60, total_minutes % 60)
    }
}

/// One-line summary of today's stats.
pub fn stats_summary(stats: &DailyStats) -> String {
    format!(
        "Today: focus {} / pomodoros {}",
        format_focus_time(stats.total_work_seconds),
        stats.completed_cycles
    )
}

/// Returns the emoji for a mode.
pub fn mode_emoji(mode: Mode) -> &'static str {
    match mode {
        Mode::Work => WORK_EMOJI,
        Mode::Rest => REST_EMOJI,
        Mode::LongRest => LONG_REST_EMOJI,
        Mode::Ready | Mode::Stopped => IDLE_EMOJI,
    }
}

/// Status line for a frame, e.g. `🔥 Focus 24:59 | Today: focus 25m / pomodoros 1`.
pub fn status_line(frame: &Frame) -> String {
    let timer = match frame.mode {
        Mode::Ready | Mode::Stopped => frame.mode.label().to_string(),
        mode => format!("{} {}", mode.label(), format_clock(frame.remaining_seconds)),
    };
    format!(
        "{} {} | {}",
        mode_emoji(frame.mode),
        timer,
        stats_summary(&frame.stats)
    )
}
