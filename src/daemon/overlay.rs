//! Rest overlay enforcement.
//!
//! The overlay blocks the screen for the length of a rest. Its dismissal
//! policy is fixed when it is presented: later changes to the force-rest
//! setting never unlock (or lock) an overlay that is already showing.

use crate::ui::format_clock;

/// How the overlay may be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissPolicy {
    /// Dismissible at any time; reaching zero closes it automatically.
    Soft,
    /// Locked until the countdown ends, then waits for acknowledgement.
    Forced,
}

/// Which rest the overlay belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestKind {
    Short,
    Long,
}

/// Answer to a dismissal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissDecision {
    Allowed,
    Rejected,
}

/// What happens when the overlay countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// Close and resume work right away
    AutoClose,
    /// Stay up until the user acknowledges
    AwaitAcknowledgement,
}

/// Presentation data for the overlay surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub kind: RestKind,
    pub headline: String,
    pub countdown: String,
    pub prompt: String,
    pub dismissible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Overlay {
    kind: RestKind,
    policy: DismissPolicy,
    minutes: u32,
    awaiting_ack: bool,
}

/// Presents and polices the full-screen rest block.
#[derive(Debug, Default)]
pub struct OverlayGate {
    active: Option<Overlay>,
}

impl OverlayGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the overlay for a rest of `minutes`.
    ///
    /// `force_rest` only applies to short rests; long rests are always soft.
    pub fn present(&mut self, kind: RestKind, minutes: u32, force_rest: bool) {
        let policy = match kind {
            RestKind::Short if force_rest => DismissPolicy::Forced,
            _ => DismissPolicy::Soft,
        };
        tracing::debug!(?kind, ?policy, minutes, "Presenting rest overlay");
        self.active = Some(Overlay {
            kind,
            policy,
            minutes,
            awaiting_ack: false,
        });
    }

    /// Returns true while the overlay is showing.
    pub fn is_presented(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the policy captured at presentation.
    pub fn policy(&self) -> Option<DismissPolicy> {
        self.active.map(|overlay| overlay.policy)
    }

    /// Returns true once a forced overlay has finished counting down.
    pub fn is_awaiting_acknowledgement(&self) -> bool {
        self.active.is_some_and(|overlay| overlay.awaiting_ack)
    }

    /// Decides whether a dismissal attempt succeeds.
    pub fn request_dismiss(&self, remaining_seconds: u32) -> DismissDecision {
        match self.active {
            None => DismissDecision::Rejected,
            Some(overlay) if overlay.policy == DismissPolicy::Forced && remaining_seconds > 0 => {
                DismissDecision::Rejected
            }
            Some(_) => DismissDecision::Allowed,
        }
    }

    /// Handles the countdown reaching zero.
    pub fn countdown_finished(&mut self) -> CountdownOutcome {
        match self.active.as_mut() {
            Some(overlay) if overlay.policy == DismissPolicy::Forced => {
                overlay.awaiting_ack = true;
                CountdownOutcome::AwaitAcknowledgement
            }
            _ => CountdownOutcome::AutoClose,
        }
    }

    /// Removes the overlay. Returns true if one was showing.
    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Builds the view for the given remaining time.
    pub fn view(&self, remaining_seconds: u32) -> Option<OverlayView> {
        let overlay = self.active?;

        let headline = match (overlay.kind, overlay.awaiting_ack, remaining_seconds) {
            (RestKind::Short, true, _) => "Rest is over! Dismiss to start the next focus session.".to_string(),
            (RestKind::Long, _, 0) => "Long rest is over! Dismiss when you are ready to start again.".to_string(),
            (RestKind::Short, _, _) => format!(
                "Time for a break!\nRest for {} minutes.",
                overlay.minutes
            ),
            (RestKind::Long, _, _) => format!(
                "Well done! Time for a long rest.\nRelax for {} minutes.",
                overlay.minutes
            ),
        };

        let dismissible = self.request_dismiss(remaining_seconds) == DismissDecision::Allowed;
        let prompt = match (overlay.kind, dismissible) {
            (_, false) => "The screen stays locked until the rest ends.",
            (RestKind::Long, true) if remaining_seconds > 0 => {
                "Long rest in progress... dismiss to end it early."
            }
            (_, true) => "Dismiss to end the rest and start the next focus session.",
        };

        Some(OverlayView {
            kind: overlay.kind,
            headline,
            countdown: format_clock(remaining_seconds),
            prompt: prompt.to_string(),
            dismissible,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
