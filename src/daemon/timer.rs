//! Timer engine for Refresh Pomodoro.
//!
//! This module provides the core timer functionality:
//! - State transitions (Ready → Work → Rest/LongRest → Work … → Stopped)
//! - One-second countdown driven through the single-slot scheduler
//! - Rest overlay enforcement (soft or forced dismissal)
//! - Long-rest offers every N completed cycles
//! - Meal reminders and daily stats with day rollover
//!
//! The engine is synchronous. The runner drives [`TimerEngine::tick`] once
//! per second and [`TimerEngine::poll_meals`] on a coarser interval, and
//! every mutation ends with a `render` call on the UI boundary.

use crate::settings::SettingsStore;
use crate::types::{Mode, SettingKey, TimerConfig, TimerError, TimerState};
use crate::ui::{Frame, UiBoundary};

use super::meal::{MealAlertScheduler, PollOutcome};
use super::overlay::{CountdownOutcome, DismissDecision, OverlayGate, RestKind};
use super::scheduler::{Clock, Scheduler, TaskKind};
use super::stats::StatsAccumulator;

/// Countdown period in seconds.
const TICK_PERIOD_SECS: u32 = 1;

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns all mutable timer state.
pub struct TimerEngine {
    /// Current mode and countdown
    state: TimerState,
    /// Current configuration, validated lazily
    config: TimerConfig,
    /// Today's stats
    stats: StatsAccumulator,
    /// Meal reminder flags
    meals: MealAlertScheduler,
    /// Rest overlay
    overlay: OverlayGate,
    /// The one scheduled countdown
    scheduler: Scheduler,
    clock: Box<dyn Clock>,
    store: Box<dyn SettingsStore>,
    ui: Box<dyn UiBoundary>,
}

impl TimerEngine {
    /// Creates an engine from the settings in `store` as of the clock's date.
    pub fn new(
        store: Box<dyn SettingsStore>,
        ui: Box<dyn UiBoundary>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let settings = store.load(clock.today());
        tracing::debug!(
            total_work_seconds = settings.stats.total_work_seconds,
            completed_cycles = settings.stats.completed_cycles,
            "Loaded settings"
        );
        Self {
            state: TimerState::new(),
            config: settings.config,
            stats: StatsAccumulator::new(settings.stats),
            meals: MealAlertScheduler::new(),
            overlay: OverlayGate::new(),
            scheduler: Scheduler::new(),
            clock,
            store,
            ui,
        }
    }

    /// Returns the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns today's stats.
    pub fn stats(&self) -> &StatsAccumulator {
        &self.stats
    }

    /// Returns the rest overlay.
    pub fn overlay(&self) -> &OverlayGate {
        &self.overlay
    }

    /// Returns the scheduler.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Returns the meal reminder scheduler.
    pub fn meals(&self) -> &MealAlertScheduler {
        &self.meals
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts a work session.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` outside Ready/Stopped, or `InvalidDuration`
    /// if a setting the session depends on is invalid. Either way the state
    /// is left unchanged.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.state.mode.is_running() {
            tracing::debug!(mode = %self.state.mode, "Start rejected");
            return Err(TimerError::AlreadyRunning);
        }

        self.config.validate_for_start()?;
        let minutes = self.config.work_minutes()?;

        self.begin_work(minutes);
        tracing::info!(work_minutes = minutes, "Timer started");
        Ok(())
    }

    /// Stops the timer.
    ///
    /// Partial work is credited without counting a cycle, and any overlay is
    /// closed regardless of its policy. Returns false if the timer was
    /// already idle.
    pub fn stop(&mut self) -> bool {
        if self.state.mode.is_idle() {
            return false;
        }

        self.scheduler.cancel();
        if self.state.mode == Mode::Work {
            let partial = self.state.take_session_work();
            self.stats.commit_work(partial);
            tracing::debug!(partial_seconds = partial, "Credited partial work session");
        }
        self.overlay.close();
        self.state.stop();
        tracing::info!("Timer stopped");

        self.persist();
        self.render();
        true
    }

    /// Advances time by one second.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` if a transition triggered by this tick found
    /// an invalid setting. The timer is Stopped and the user has already been
    /// notified.
    pub fn tick(&mut self) -> Result<(), TimerError> {
        let Some(task) = self.scheduler.advance() else {
            return Ok(());
        };

        match task.kind() {
            TaskKind::Countdown => self.work_countdown(),
            TaskKind::OverlayCountdown => self.overlay_countdown(),
        }
    }

    /// Tries to dismiss the rest overlay.
    ///
    /// Returns `Ok(false)` when there is no overlay or its policy rejects the
    /// attempt; `Ok(true)` when the rest ended and work resumed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` if work could not resume.
    pub fn dismiss_overlay(&mut self) -> Result<bool, TimerError> {
        match self.overlay.request_dismiss(self.state.remaining_seconds) {
            DismissDecision::Rejected => {
                tracing::debug!(
                    presented = self.overlay.is_presented(),
                    remaining_seconds = self.state.remaining_seconds,
                    "Overlay dismissal rejected"
                );
                Ok(false)
            }
            DismissDecision::Allowed => {
                tracing::info!(mode = %self.state.mode, "Rest dismissed");
                self.finish_rest()?;
                Ok(true)
            }
        }
    }

    /// Checks the wall clock for day rollover and due meal reminders.
    pub fn poll_meals(&mut self) -> PollOutcome {
        let now = self.clock.now();
        let outcome = self.meals.poll(now, &self.config, &mut self.stats);

        if let Some(alert) = &outcome.alert {
            self.ui.notify(&alert.message());
        }
        if outcome.rolled_over {
            self.render();
        }
        outcome
    }

    /// Changes one setting and saves.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` for duration settings while a session is in
    /// progress, or `InvalidSetting` for a toggle that is not a boolean.
    pub fn apply_setting(&mut self, key: &SettingKey, value: &str) -> Result<(), TimerError> {
        if key.is_duration() && self.state.mode.is_running() {
            return Err(TimerError::AlreadyRunning);
        }

        self.config.apply(key, value)?;
        tracing::info!(%key, value, "Setting changed");
        self.persist();
        self.render();
        Ok(())
    }

    /// Shows a message on the UI.
    pub fn notify(&mut self, message: &str) {
        self.ui.notify(message);
    }

    /// Shows an error and how to fix it.
    pub fn surface_error(&mut self, err: &TimerError) {
        if err.is_recoverable() {
            tracing::debug!(error = %err, "Operation rejected");
        } else {
            tracing::warn!(error = %err, "Timer cannot continue");
        }
        self.ui.notify(&format!("{}. {}", err, err.suggestion()));
    }

    /// Redraws the current state.
    pub fn render(&mut self) {
        let frame = self.frame();
        self.ui.render(&frame);
    }

    /// Stops the timer (crediting partial work) and saves.
    pub fn shutdown(&mut self) {
        if !self.stop() {
            self.persist();
        }
        tracing::info!("Timer shut down");
    }

    /// Builds the frame for the current state.
    pub fn frame(&self) -> Frame {
        Frame {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            stats: self.stats.snapshot().clone(),
            overlay: self.overlay.view(self.state.remaining_seconds),
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn work_countdown(&mut self) -> Result<(), TimerError> {
        self.state.session_work_seconds = self.state.session_work_seconds.saturating_add(1);
        if self.state.countdown() {
            return self.complete_work();
        }
        self.render();
        Ok(())
    }

    fn overlay_countdown(&mut self) -> Result<(), TimerError> {
        if !self.state.countdown() {
            self.render();
            return Ok(());
        }

        match self.overlay.countdown_finished() {
            CountdownOutcome::AwaitAcknowledgement => {
                self.scheduler.cancel();
                tracing::info!("Forced rest finished, waiting for dismissal");
                self.render();
                Ok(())
            }
            CountdownOutcome::AutoClose => self.finish_rest(),
        }
    }

    fn complete_work(&mut self) -> Result<(), TimerError> {
        self.observe_date();
        let session = self.state.take_session_work();
        self.stats.commit_work(session);
        let cycles = self.stats.commit_cycle();
        tracing::info!(session_seconds = session, completed_cycles = cycles, "Work session completed");
        self.persist();

        if let Some(minutes) = self.long_rest_due(cycles) {
            let message = format!(
                "You've completed {cycles} pomodoros! Take a {minutes}-minute long rest?"
            );
            if self.ui.prompt_yes_no(&message) {
                self.begin_long_rest(minutes);
                return Ok(());
            }
            tracing::debug!("Long rest declined");
        }

        self.begin_rest()
    }

    /// Returns the long-rest length if an offer is due after `cycles`.
    fn long_rest_due(&self, cycles: u32) -> Option<u32> {
        if !self.config.long_rest_enabled {
            return None;
        }
        match self.config.long_rest_plan() {
            Ok(plan) if cycles > 0 && cycles % plan.every_n_cycles == 0 => Some(plan.minutes),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping long rest offer");
                None
            }
        }
    }

    fn begin_work(&mut self, minutes: u32) {
        self.state.begin_work(minutes);
        self.scheduler.schedule_every(TaskKind::Countdown, TICK_PERIOD_SECS);
        self.render();
    }

    fn begin_rest(&mut self) -> Result<(), TimerError> {
        let minutes = self
            .config
            .rest_minutes()
            .map_err(|e| self.abort_to_stopped(e))?;

        self.state.begin_rest(false, minutes);
        self.overlay
            .present(RestKind::Short, minutes, self.config.force_rest);
        self.scheduler
            .schedule_every(TaskKind::OverlayCountdown, TICK_PERIOD_SECS);
        tracing::info!(rest_minutes = minutes, force_rest = self.config.force_rest, "Rest started");
        self.render();
        Ok(())
    }

    fn begin_long_rest(&mut self, minutes: u32) {
        self.state.begin_rest(true, minutes);
        self.overlay.present(RestKind::Long, minutes, self.config.force_rest);
        self.scheduler
            .schedule_every(TaskKind::OverlayCountdown, TICK_PERIOD_SECS);
        tracing::info!(long_rest_minutes = minutes, "Long rest started");
        self.render();
    }

    fn finish_rest(&mut self) -> Result<(), TimerError> {
        self.overlay.close();
        let minutes = self
            .config
            .work_minutes()
            .map_err(|e| self.abort_to_stopped(e))?;

        tracing::info!(work_minutes = minutes, "Rest finished, back to work");
        self.begin_work(minutes);
        Ok(())
    }

    /// Forces Stopped after a transition found an invalid setting.
    fn abort_to_stopped(&mut self, err: TimerError) -> TimerError {
        tracing::debug!(mode = %self.state.mode, "Transition aborted");
        self.scheduler.cancel();
        self.overlay.close();
        self.state.stop();
        self.surface_error(&err);
        self.render();
        err
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    fn observe_date(&mut self) {
        let now = self.clock.now();
        if self.meals.observe_date(now, &mut self.stats) {
            self.render();
        }
    }

    /// Saves config and stats. Failures are logged and otherwise ignored.
    fn persist(&mut self) {
        self.observe_date();
        let today = self.clock.today();
        if let Err(e) = self.store.save(&self.config, self.stats.snapshot(), today) {
            tracing::warn!(error = %e, "Failed to save settings");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::overlay::DismissPolicy;
    use crate::daemon::scheduler::ManualClock;
    use crate::settings::{MemorySettingsStore, SettingsFile};
    use crate::types::{DurationField, NumericSetting};
    use crate::ui::RecordingUi;
    use chrono::{NaiveDate, NaiveDateTime};

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    struct Harness {
        engine: TimerEngine,
        ui: RecordingUi,
        store: MemorySettingsStore,
        clock: ManualClock,
    }

    fn harness_with(config: TimerConfig, ui: RecordingUi) -> Harness {
        let store = MemorySettingsStore::with_document(SettingsFile {
            config,
            total_work_seconds: 0,
            completed_cycles: 0,
            last_saved_date: None,
        });
        let clock = ManualClock::new(morning());
        let engine = TimerEngine::new(
            Box::new(store.clone()),
            Box::new(ui.clone()),
            Box::new(clock.clone()),
        );
        Harness {
            engine,
            ui,
            store,
            clock,
        }
    }

    fn harness(config: TimerConfig) -> Harness {
        harness_with(config, RecordingUi::new())
    }

    fn short_config() -> TimerConfig {
        TimerConfig::default()
            .with_work_minutes(1)
            .with_rest_minutes(1)
            .with_force_rest(false)
            .without_long_rest()
    }

    fn ticks(engine: &mut TimerEngine, n: u32) {
        for _ in 0..n {
            engine.tick().unwrap();
        }
    }

    // ------------------------------------------------------------------------
    // start / stop
    // ------------------------------------------------------------------------

    mod start_stop_tests {
        use super::*;

        #[test]
        fn test_start_sets_work_countdown() {
            let mut h = harness(TimerConfig::default().with_work_minutes(30));

            h.engine.start().unwrap();

            assert_eq!(h.engine.mode(), Mode::Work);
            assert_eq!(h.engine.state().remaining_seconds, 1800);
            assert_eq!(h.engine.state().session_work_seconds, 0);
            assert_eq!(
                h.engine.scheduler().active().map(|t| t.kind()),
                Some(TaskKind::Countdown)
            );
            assert_eq!(h.ui.last_frame().map(|f| f.mode), Some(Mode::Work));
        }

        #[test]
        fn test_start_while_running_is_rejected() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 5);

            assert_eq!(h.engine.start(), Err(TimerError::AlreadyRunning));
            assert_eq!(h.engine.state().remaining_seconds, 55);
        }

        #[test]
        fn test_start_with_invalid_work_leaves_state() {
            let mut h = harness(TimerConfig::default().with_work_minutes(NumericSetting::new("0")));

            let err = h.engine.start().unwrap_err();

            assert_eq!(err.duration_field(), Some(DurationField::WorkMinutes));
            assert_eq!(h.engine.mode(), Mode::Ready);
            assert!(h.engine.scheduler().active().is_none());
        }

        #[test]
        fn test_start_with_invalid_rest_is_rejected_up_front() {
            let mut h = harness(TimerConfig::default().with_rest_minutes(NumericSetting::new("x")));

            let err = h.engine.start().unwrap_err();

            assert_eq!(err.duration_field(), Some(DurationField::RestMinutes));
            assert_eq!(h.engine.mode(), Mode::Ready);
        }

        #[test]
        fn test_stop_twice_is_stop_once() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 10);

            assert!(h.engine.stop());
            let after_first = (h.engine.state().clone(), h.engine.stats().snapshot().clone());
            let saves = h.store.save_count();

            assert!(!h.engine.stop());
            assert_eq!(h.engine.state(), &after_first.0);
            assert_eq!(h.engine.stats().snapshot(), &after_first.1);
            assert_eq!(h.store.save_count(), saves);
        }

        #[test]
        fn test_stop_credits_partial_work_only() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 42);

            h.engine.stop();

            assert_eq!(h.engine.mode(), Mode::Stopped);
            assert_eq!(h.engine.stats().snapshot().total_work_seconds, 42);
            assert_eq!(h.engine.stats().snapshot().completed_cycles, 0);
            assert!(h.engine.scheduler().active().is_none());
        }

        #[test]
        fn test_stop_closes_forced_overlay() {
            let mut h = harness(short_config().with_force_rest(true));
            h.engine.start().unwrap();
            ticks(&mut h.engine, 60);
            assert_eq!(h.engine.overlay().policy(), Some(DismissPolicy::Forced));

            h.engine.stop();

            assert!(!h.engine.overlay().is_presented());
            assert_eq!(h.engine.stats().snapshot().total_work_seconds, 60);
        }

        #[test]
        fn test_restart_after_stop() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            h.engine.stop();

            h.engine.start().unwrap();
            assert_eq!(h.engine.mode(), Mode::Work);
        }
    }

    // ------------------------------------------------------------------------
    // tick
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_while_idle_does_nothing() {
            let mut h = harness(short_config());
            h.engine.tick().unwrap();
            assert_eq!(h.engine.mode(), Mode::Ready);
            assert_eq!(h.ui.render_count(), 0);
        }

        #[test]
        fn test_tick_decrements_by_one() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();

            for expected in (1..60).rev() {
                h.engine.tick().unwrap();
                assert_eq!(h.engine.state().remaining_seconds, expected);
            }
            assert_eq!(h.engine.state().session_work_seconds, 59);
        }

        #[test]
        fn test_work_completion_commits_cycle() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();

            ticks(&mut h.engine, 60);

            assert_eq!(h.engine.mode(), Mode::Rest);
            assert_eq!(h.engine.state().remaining_seconds, 60);
            assert_eq!(h.engine.stats().snapshot().total_work_seconds, 60);
            assert_eq!(h.engine.stats().snapshot().completed_cycles, 1);
            assert!(h.engine.overlay().is_presented());
        }

        #[test]
        fn test_cycle_completion_is_saved() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();

            ticks(&mut h.engine, 60);

            let doc = h.store.document().unwrap();
            assert_eq!(doc.completed_cycles, 1);
            assert_eq!(doc.total_work_seconds, 60);
            assert_eq!(doc.last_saved_date, Some(morning().date()));
        }

        #[test]
        fn test_save_failure_does_not_interrupt() {
            let mut h = harness(short_config());
            h.store.set_should_fail(true);
            h.engine.start().unwrap();

            ticks(&mut h.engine, 60);

            assert_eq!(h.engine.mode(), Mode::Rest);
            assert_eq!(h.engine.stats().snapshot().completed_cycles, 1);
        }

        #[test]
        fn test_soft_rest_returns_to_work_at_zero() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 120);

            assert_eq!(h.engine.mode(), Mode::Work);
            assert_eq!(h.engine.state().remaining_seconds, 60);
            assert!(!h.engine.overlay().is_presented());
        }

        #[test]
        fn test_forced_rest_waits_for_acknowledgement() {
            let mut h = harness(short_config().with_force_rest(true));
            h.engine.start().unwrap();
            ticks(&mut h.engine, 120);

            assert_eq!(h.engine.mode(), Mode::Rest);
            assert_eq!(h.engine.state().remaining_seconds, 0);
            assert!(h.engine.overlay().is_awaiting_acknowledgement());
            assert!(h.engine.scheduler().active().is_none());

            ticks(&mut h.engine, 30);
            assert_eq!(h.engine.mode(), Mode::Rest);
        }
    }

    // ------------------------------------------------------------------------
    // Overlay dismissal
    // ------------------------------------------------------------------------

    mod dismiss_tests {
        use super::*;

        #[test]
        fn test_dismiss_without_overlay() {
            let mut h = harness(short_config());
            assert_eq!(h.engine.dismiss_overlay(), Ok(false));
            h.engine.start().unwrap();
            assert_eq!(h.engine.dismiss_overlay(), Ok(false));
            assert_eq!(h.engine.mode(), Mode::Work);
        }

        #[test]
        fn test_soft_dismiss_discards_remaining_rest() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 70);

            assert_eq!(h.engine.dismiss_overlay(), Ok(true));

            assert_eq!(h.engine.mode(), Mode::Work);
            assert_eq!(h.engine.state().remaining_seconds, 60);
            assert_eq!(
                h.engine.scheduler().active().map(|t| t.kind()),
                Some(TaskKind::Countdown)
            );
        }

        #[test]
        fn test_forced_dismiss_rejected_then_allowed() {
            let mut h = harness(short_config().with_force_rest(true));
            h.engine.start().unwrap();
            ticks(&mut h.engine, 90);

            assert_eq!(h.engine.dismiss_overlay(), Ok(false));
            assert_eq!(h.engine.mode(), Mode::Rest);
            assert_eq!(h.engine.state().remaining_seconds, 30);

            ticks(&mut h.engine, 30);
            assert_eq!(h.engine.dismiss_overlay(), Ok(true));
            assert_eq!(h.engine.mode(), Mode::Work);
            assert_eq!(h.engine.state().remaining_seconds, 60);
        }

        #[test]
        fn test_policy_captured_at_presentation() {
            let mut h = harness(short_config().with_force_rest(true));
            h.engine.start().unwrap();
            ticks(&mut h.engine, 61);

            h.engine.apply_setting(&SettingKey::ForceRest, "false").unwrap();

            assert!(!h.engine.config().force_rest);
            assert_eq!(h.engine.overlay().policy(), Some(DismissPolicy::Forced));
            assert_eq!(h.engine.dismiss_overlay(), Ok(false));
        }

        #[test]
        fn test_invalid_work_on_resume_stops() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 61);

            // Edits are rejected while running, so corrupt the stored value
            // through the config itself.
            h.engine.config.work_minutes = NumericSetting::new("-1");
            let err = h.engine.dismiss_overlay().unwrap_err();

            assert_eq!(err.duration_field(), Some(DurationField::WorkMinutes));
            assert_eq!(h.engine.mode(), Mode::Stopped);
            assert!(!h.engine.overlay().is_presented());
            assert!(h.ui.notifications().iter().any(|n| n.contains("Work time")));
        }
    }

    // ------------------------------------------------------------------------
    // Long rest
    // ------------------------------------------------------------------------

    mod long_rest_tests {
        use super::*;

        fn long_rest_config() -> TimerConfig {
            short_config().with_long_rest(2, 3)
        }

        #[test]
        fn test_offer_on_multiple_only() {
            let mut h = harness(long_rest_config());
            h.engine.start().unwrap();

            ticks(&mut h.engine, 120);
            assert!(h.ui.prompts().is_empty());

            ticks(&mut h.engine, 60);
            assert_eq!(h.ui.prompts().len(), 1);
            assert!(h.ui.prompts()[0].contains("2 pomodoros"));
            assert!(h.ui.prompts()[0].contains("3-minute"));
        }

        #[test]
        fn test_accepted_offer_starts_soft_long_rest() {
            let config = short_config().with_force_rest(true).with_long_rest(1, 3);
            let mut h = harness_with(config, RecordingUi::answering(true));
            h.engine.start().unwrap();
            ticks(&mut h.engine, 60);

            assert_eq!(h.engine.mode(), Mode::LongRest);
            assert_eq!(h.engine.state().remaining_seconds, 180);
            assert_eq!(h.engine.overlay().policy(), Some(DismissPolicy::Soft));

            ticks(&mut h.engine, 180);
            assert_eq!(h.engine.mode(), Mode::Work);
        }

        #[test]
        fn test_declined_offer_falls_back_to_rest() {
            let mut h = harness(long_rest_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 180);

            assert_eq!(h.engine.mode(), Mode::Rest);
            assert_eq!(h.engine.state().remaining_seconds, 60);
        }

        #[test]
        fn test_invalid_long_rest_at_completion_skips_offer() {
            let mut h = harness_with(long_rest_config(), RecordingUi::answering(true));
            h.engine.start().unwrap();
            ticks(&mut h.engine, 120);
            h.engine.config.long_rest_minutes = NumericSetting::new("0");

            ticks(&mut h.engine, 60);

            assert!(h.ui.prompts().is_empty());
            assert_eq!(h.engine.mode(), Mode::Rest);
        }

        #[test]
        fn test_disabled_long_rest_never_offers() {
            let mut h = harness_with(short_config(), RecordingUi::answering(true));
            h.engine.start().unwrap();
            ticks(&mut h.engine, 120 * 4);
            assert!(h.ui.prompts().is_empty());
        }
    }

    // ------------------------------------------------------------------------
    // Settings, meals, rollover
    // ------------------------------------------------------------------------

    mod settings_tests {
        use super::*;

        #[test]
        fn test_duration_edit_rejected_while_running() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();

            assert_eq!(
                h.engine.apply_setting(&SettingKey::WorkMinutes, "50"),
                Err(TimerError::AlreadyRunning)
            );
            assert_eq!(h.engine.config().work_minutes(), Ok(1));
        }

        #[test]
        fn test_edit_while_idle_is_saved() {
            let mut h = harness(short_config());

            h.engine.apply_setting(&SettingKey::RestMinutes, "10").unwrap();

            let doc = h.store.document().unwrap();
            assert_eq!(doc.config.rest_minutes, NumericSetting::from(10));
        }

        #[test]
        fn test_invalid_rest_at_transition_stops() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            h.engine.config.rest_minutes = NumericSetting::new("abc");

            let mut result = Ok(());
            for _ in 0..60 {
                result = h.engine.tick();
            }

            assert_eq!(
                result.unwrap_err().duration_field(),
                Some(DurationField::RestMinutes)
            );
            assert_eq!(h.engine.mode(), Mode::Stopped);
            assert_eq!(h.engine.stats().snapshot().completed_cycles, 1);
            assert!(h.engine.scheduler().active().is_none());
        }

        #[test]
        fn test_meal_alert_notifies() {
            let mut h = harness(short_config());
            h.clock.set(morning().date().and_hms_opt(12, 0, 10).unwrap());

            let outcome = h.engine.poll_meals();

            assert!(outcome.alert.is_some());
            assert_eq!(h.ui.notifications().len(), 1);
            assert!(h.ui.notifications()[0].contains("lunch"));

            h.engine.poll_meals();
            assert_eq!(h.ui.notifications().len(), 1);
        }

        #[test]
        fn test_rollover_resets_stats_and_renders() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 60);
            h.engine.stop();
            h.ui.clear();

            h.clock.advance(chrono::Duration::days(1));
            let outcome = h.engine.poll_meals();

            assert!(outcome.rolled_over);
            assert_eq!(h.engine.stats().snapshot().total_work_seconds, 0);
            assert_eq!(h.engine.stats().snapshot().completed_cycles, 0);
            assert_eq!(h.ui.render_count(), 1);
        }

        #[test]
        fn test_shutdown_saves_partial_work() {
            let mut h = harness(short_config());
            h.engine.start().unwrap();
            ticks(&mut h.engine, 15);

            h.engine.shutdown();

            let doc = h.store.document().unwrap();
            assert_eq!(doc.total_work_seconds, 15);
            assert_eq!(doc.completed_cycles, 0);
        }

        #[test]
        fn test_shutdown_while_idle_still_saves() {
            let mut h = harness(short_config());
            h.engine.shutdown();
            assert_eq!(h.store.save_count(), 1);
        }

        #[test]
        fn test_loaded_stats_for_today() {
            let store = MemorySettingsStore::with_document(SettingsFile {
                config: short_config(),
                total_work_seconds: 3000,
                completed_cycles: 2,
                last_saved_date: Some(morning().date()),
            });
            let engine = TimerEngine::new(
                Box::new(store),
                Box::new(RecordingUi::new()),
                Box::new(ManualClock::new(morning())),
            );

            assert_eq!(engine.stats().snapshot().total_work_seconds, 3000);
            assert_eq!(engine.stats().snapshot().completed_cycles, 2);
        }
    }

    #[test]
    fn test_frame_carries_overlay_view() {
        let mut h = harness(short_config().with_force_rest(true));
        h.engine.start().unwrap();
        ticks(&mut h.engine, 60);

        let frame = h.ui.last_frame().unwrap();
        assert_eq!(frame.mode, Mode::Rest);
        let view = frame.overlay.unwrap();
        assert!(!view.dismissible);
        assert_eq!(view.countdown, "01:00");
    }
}
