//! User interface boundary for the timer.
//!
//! The engine only ever calls outward through [`UiBoundary`]:
//! - `render` after every state mutation
//! - `notify` for meal reminders and surfaced errors
//! - `prompt_yes_no` for the long-rest offer, answered synchronously
//!
//! # Architecture
//!
//! - `format.rs`: Display text generation (terminal-independent, fully testable)
//! - `terminal.rs`: Line-oriented terminal implementation
//! - `RecordingUi`: In-memory implementation for tests

pub mod format;
pub mod terminal;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::daemon::overlay::OverlayView;
use crate::types::{DailyStats, Mode};

pub use format::{format_clock, format_focus_time, stats_summary, status_line};
pub use terminal::TerminalUi;

// ============================================================================
// Frame
// ============================================================================

/// Everything the UI needs to draw one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub mode: Mode,
    pub remaining_seconds: u32,
    pub stats: DailyStats,
    /// Present while a rest overlay is showing
    pub overlay: Option<OverlayView>,
}

// ============================================================================
// UiBoundary
// ============================================================================

/// Callbacks the timer core makes into the user interface.
pub trait UiBoundary {
    /// Asks a yes/no question and waits for the answer.
    fn prompt_yes_no(&mut self, message: &str) -> bool;

    /// Shows a message without waiting.
    fn notify(&mut self, message: &str);

    /// Redraws the timer.
    fn render(&mut self, frame: &Frame);
}

// ============================================================================
// RecordingUi
// ============================================================================

#[derive(Debug, Default)]
struct Recorded {
    prompts: Vec<String>,
    answers: VecDeque<bool>,
    default_answer: bool,
    notifications: Vec<String>,
    frames: Vec<Frame>,
}

/// UI that records every call, for testing.
///
/// Clones share the same record so a test can keep a handle after moving
/// one into the engine.
#[derive(Debug, Clone, Default)]
pub struct RecordingUi {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingUi {
    /// Creates a UI that declines every prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every prompt with `answer` unless a queued answer exists.
    #[must_use]
    pub fn answering(answer: bool) -> Self {
        let ui = Self::new();
        ui.inner.lock().unwrap().default_answer = answer;
        ui
    }

    /// Queues an answer for the next prompt.
    pub fn queue_answer(&self, answer: bool) {
        self.inner.lock().unwrap().answers.push_back(answer);
    }

    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.inner.lock().unwrap().prompts.clone()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<String> {
        self.inner.lock().unwrap().notifications.clone()
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.inner.lock().unwrap().frames.len()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<Frame> {
        self.inner.lock().unwrap().frames.last().cloned()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.prompts.clear();
        inner.notifications.clear();
        inner.frames.clear();
    }
}

impl UiBoundary for RecordingUi {
    fn prompt_yes_no(&mut self, message: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.prompts.push(message.to_string());
        let default_answer = inner.default_answer;
        inner.answers.pop_front().unwrap_or(default_answer)
    }

    fn notify(&mut self, message: &str) {
        self.inner
            .lock()
            .unwrap()
            .notifications
            .push(message.to_string());
    }

    fn render(&mut self, frame: &Frame) {
        self.inner.lock().unwrap().frames.push(frame.clone());
    }
}
