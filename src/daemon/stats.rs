//! Daily focus statistics.

use chrono::NaiveDate;

use crate::types::DailyStats;

/// Accumulates today's focused seconds and completed cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsAccumulator {
    stats: DailyStats,
}

impl StatsAccumulator {
    /// Wraps previously loaded stats.
    pub fn new(stats: DailyStats) -> Self {
        Self { stats }
    }

    /// Returns the current counters.
    pub fn snapshot(&self) -> &DailyStats {
        &self.stats
    }

    /// Adds focused seconds, partial sessions included.
    pub fn commit_work(&mut self, seconds: u32) {
        self.stats.total_work_seconds += u64::from(seconds);
    }

    /// Counts one completed cycle and returns the new total.
    pub fn commit_cycle(&mut self) -> u32 {
        self.stats.completed_cycles += 1;
        self.stats.completed_cycles
    }

    /// Zeroes both counters and moves them to `date`.
    pub fn reset_for_new_day(&mut self, date: NaiveDate) {
        self.stats = DailyStats::new(date);
    }

    /// Resets the counters if `today` is not the date they belong to.
    ///
    /// Returns true when a rollover happened.
    pub fn roll_over_if_needed(&mut self, today: NaiveDate) -> bool {
        if self.stats.date == today {
            return false;
        }
        tracing::info!(
            previous = %self.stats.date,
            %today,
            total_work_seconds = self.stats.total_work_seconds,
            completed_cycles = self.stats.completed_cycles,
            "Day rolled over, resetting daily stats"
        );
        self.reset_for_new_day(today);
        true
    }
}
