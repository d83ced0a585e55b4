//! Clock and one-second scheduler.
//!
//! The scheduler is a cooperative primitive advanced once per second by the
//! event loop. At most one repeating task is active at a time: scheduling a
//! new one cancels the previous, so a stale countdown can never fire after a
//! mode transition.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate, NaiveDateTime};

// ============================================================================
// Clock
// ============================================================================

/// Source of wall-clock time.
pub trait Clock {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock for testing.
///
/// Clones share the same time, so a test can keep one handle and move the
/// other into the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// What a scheduled task drives when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Work-session countdown
    Countdown,
    /// Rest overlay countdown
    OverlayCountdown,
}

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    id: u64,
    kind: TaskKind,
}

impl TaskHandle {
    /// Returns what this task drives.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}

#[derive(Debug)]
struct ScheduledTask {
    handle: TaskHandle,
    period_secs: u32,
    until_due: u32,
}

/// Single-slot repeating scheduler advanced in whole seconds.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    active: Option<ScheduledTask>,
}

impl Scheduler {
    /// Creates an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` to fire every `period_secs` seconds.
    ///
    /// Any previously scheduled task is cancelled first.
    pub fn schedule_every(&mut self, kind: TaskKind, period_secs: u32) -> TaskHandle {
        if let Some(previous) = self.cancel() {
            tracing::trace!(?previous, "Replaced scheduled task");
        }

        self.next_id += 1;
        let handle = TaskHandle {
            id: self.next_id,
            kind,
        };
        let period_secs = period_secs.max(1);
        self.active = Some(ScheduledTask {
            handle,
            period_secs,
            until_due: period_secs,
        });
        handle
    }

    /// Cancels the active task, returning its handle.
    pub fn cancel(&mut self) -> Option<TaskHandle> {
        self.active.take().map(|task| task.handle)
    }

    /// Returns the active task, if any.
    pub fn active(&self) -> Option<TaskHandle> {
        self.active.as_ref().map(|task| task.handle)
    }

    /// Advances time by one second.
    ///
    /// Returns the task that became due, if any.
    pub fn advance(&mut self) -> Option<TaskHandle> {
        let task = self.active.as_mut()?;
        task.until_due -= 1;
        if task.until_due == 0 {
            task.until_due = task.period_secs;
            Some(task.handle)
        } else {
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    mod clock_tests {
        use super::*;

        #[test]
        fn test_manual_clock_shared_between_clones() {
            let clock = ManualClock::new(noon());
            let handle = clock.clone();

            handle.advance(chrono::Duration::minutes(5));

            assert_eq!(clock.now(), noon() + chrono::Duration::minutes(5));
        }

        #[test]
        fn test_manual_clock_today() {
            let clock = ManualClock::new(noon());
            clock.advance(chrono::Duration::hours(12));
            assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        }

        #[test]
        fn test_system_clock_is_local_time() {
            let before = Local::now().naive_local();
            let now = SystemClock.now();
            assert!(now >= before);
        }
    }

    mod scheduler_tests {
        use super::*;

        #[test]
        fn test_idle_scheduler_never_fires() {
            let mut scheduler = Scheduler::new();
            for _ in 0..5 {
                assert!(scheduler.advance().is_none());
            }
        }

        #[test]
        fn test_fires_every_second() {
            let mut scheduler = Scheduler::new();
            let handle = scheduler.schedule_every(TaskKind::Countdown, 1);

            assert_eq!(scheduler.advance(), Some(handle));
            assert_eq!(scheduler.advance(), Some(handle));
        }

        #[test]
        fn test_longer_period() {
            let mut scheduler = Scheduler::new();
            let handle = scheduler.schedule_every(TaskKind::Countdown, 3);

            assert_eq!(scheduler.advance(), None);
            assert_eq!(scheduler.advance(), None);
            assert_eq!(scheduler.advance(), Some(handle));
            assert_eq!(scheduler.advance(), None);
        }

        #[test]
        fn test_zero_period_is_clamped() {
            let mut scheduler = Scheduler::new();
            let handle = scheduler.schedule_every(TaskKind::Countdown, 0);
            assert_eq!(scheduler.advance(), Some(handle));
        }

        #[test]
        fn test_scheduling_replaces_previous_task() {
            let mut scheduler = Scheduler::new();
            let first = scheduler.schedule_every(TaskKind::Countdown, 1);
            let second = scheduler.schedule_every(TaskKind::OverlayCountdown, 1);

            assert_ne!(first, second);
            assert_ne!(scheduler.active(), Some(first));
            assert_eq!(scheduler.active(), Some(second));
            assert_eq!(
                scheduler.advance().map(|h| h.kind()),
                Some(TaskKind::OverlayCountdown)
            );
        }

        #[test]
        fn test_cancel() {
            let mut scheduler = Scheduler::new();
            let handle = scheduler.schedule_every(TaskKind::Countdown, 1);

            assert_eq!(scheduler.cancel(), Some(handle));
            assert_eq!(scheduler.cancel(), None);
            assert!(scheduler.advance().is_none());
            assert!(scheduler.active().is_none());
        }
    }
}
