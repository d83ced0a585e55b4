//! Line-oriented terminal implementation of the UI boundary.
//!
//! Input lines arrive on a crossbeam channel fed by a reader thread. The
//! event loop drains the same channel for commands; while a yes/no prompt
//! is open this UI blocks on it instead, which keeps the prompt synchronous
//! from the engine's point of view.

use std::io::{self, Stdout, Write};

use crossbeam_channel::Receiver;

use crate::daemon::overlay::OverlayView;

use super::format::status_line;
use super::{Frame, UiBoundary};

/// Clears the current terminal line.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Terminal bell.
const BELL: &str = "\x07";

/// Terminal UI writing to `W` (stdout by default).
pub struct TerminalUi<W: Write = Stdout> {
    input: Receiver<String>,
    out: W,
    shown_overlay: Option<(String, bool)>,
}

impl TerminalUi<Stdout> {
    /// Creates a UI on stdout reading answers from `input`.
    pub fn stdout(input: Receiver<String>) -> Self {
        Self::new(input, io::stdout())
    }
}

impl<W: Write> TerminalUi<W> {
    pub fn new(input: Receiver<String>, out: W) -> Self {
        Self {
            input,
            out,
            shown_overlay: None,
        }
    }

    /// Returns the output writer.
    pub fn output(&self) -> &W {
        &self.out
    }

    fn write(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::debug!(error = %e, "Failed to write to terminal");
        }
    }

    /// Prints the overlay banner when it appears or its message changes.
    fn show_overlay(&mut self, overlay: Option<&OverlayView>) {
        let key = overlay.map(|view| (view.headline.clone(), view.dismissible));
        if key == self.shown_overlay {
            return;
        }
        self.shown_overlay = key;

        let banner = match overlay {
            Some(view) => {
                let rule = "=".repeat(60);
                format!(
                    "{CLEAR_LINE}{rule}\n{}\n{}\n{rule}\n",
                    view.headline, view.prompt
                )
            }
            None => format!("{CLEAR_LINE}--- rest overlay closed ---\n"),
        };
        self.write(&banner);
    }
}

impl<W: Write> UiBoundary for TerminalUi<W> {
    fn prompt_yes_no(&mut self, message: &str) -> bool {
        self.write(&format!("{CLEAR_LINE}{BELL}{message} [y/N] "));
        match self.input.recv() {
            Ok(line) => is_yes(&line),
            Err(_) => {
                tracing::debug!("Input closed while prompting, treating as no");
                false
            }
        }
    }

    fn notify(&mut self, message: &str) {
        self.write(&format!("{CLEAR_LINE}{BELL}{message}\n"));
    }

    fn render(&mut self, frame: &Frame) {
        self.show_overlay(frame.overlay.as_ref());
        let mut line = format!("{CLEAR_LINE}{}", status_line(frame));
        if let Some(view) = &frame.overlay {
            if view.dismissible {
                line.push_str("  [type 'dismiss' to continue]");
            }
        }
        self.write(&line);
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::overlay::RestKind;
    use crate::types::{DailyStats, Mode};
    use chrono::NaiveDate;

    fn frame(mode: Mode, overlay: Option<OverlayView>) -> Frame {
        Frame {
            mode,
            remaining_seconds: 300,
            stats: DailyStats::new(NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()),
            overlay,
        }
    }

    fn overlay(dismissible: bool) -> OverlayView {
        OverlayView {
            kind: RestKind::Short,
            headline: "Time for a break!".into(),
            countdown: "05:00".into(),
            prompt: "The screen stays locked until the rest ends.".into(),
            dismissible,
        }
    }

    fn output(ui: &TerminalUi<Vec<u8>>) -> String {
        String::from_utf8(ui.output().clone()).unwrap()
    }

    #[test]
    fn test_prompt_reads_answer() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut ui = TerminalUi::new(rx, Vec::new());

        tx.send("Y".to_string()).unwrap();
        assert!(ui.prompt_yes_no("Take a long rest?"));

        tx.send("nope".to_string()).unwrap();
        assert!(!ui.prompt_yes_no("Take a long rest?"));

        assert!(output(&ui).contains("Take a long rest? [y/N]"));
    }

    #[test]
    fn test_prompt_with_closed_input_is_no() {
        let (tx, rx) = crossbeam_channel::unbounded::<String>();
        drop(tx);
        let mut ui = TerminalUi::new(rx, Vec::new());
        assert!(!ui.prompt_yes_no("Take a long rest?"));
    }

    #[test]
    fn test_render_status_line() {
        let (_tx, rx) = crossbeam_channel::unbounded();
        let mut ui = TerminalUi::new(rx, Vec::new());

        ui.render(&frame(Mode::Work, None));

        assert!(output(&ui).contains("Focus 05:00"));
    }

    #[test]
    fn test_overlay_banner_printed_once() {
        let (_tx, rx) = crossbeam_channel::unbounded();
        let mut ui = TerminalUi::new(rx, Vec::new());

        ui.render(&frame(Mode::Rest, Some(overlay(false))));
        ui.render(&frame(Mode::Rest, Some(overlay(false))));

        assert_eq!(output(&ui).matches("Time for a break!").count(), 1);
        assert!(!output(&ui).contains("'dismiss'"));

        ui.render(&frame(Mode::Rest, Some(overlay(true))));
        assert_eq!(output(&ui).matches("Time for a break!").count(), 2);
        assert!(output(&ui).contains("'dismiss'"));

        ui.render(&frame(Mode::Work, None));
        assert!(output(&ui).contains("rest overlay closed"));
    }

    #[test]
    fn test_notify_rings_bell() {
        let (_tx, rx) = crossbeam_channel::unbounded();
        let mut ui = TerminalUi::new(rx, Vec::new());
        ui.notify("It's lunch time");
        assert!(output(&ui).contains("\x07It's lunch time\n"));
    }
}
