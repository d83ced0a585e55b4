//! Meal-time reminders.
//!
//! Polling is level-triggered on the wall-clock minute: a meal fires when a
//! poll lands inside its HH:MM minute and it has not fired yet today. A
//! minute the poll skips over is simply missed for the day.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::types::{TimerConfig, TimerError};

use super::stats::StatsAccumulator;

/// Parses a meal time in `HH:MM` form.
pub fn parse_meal_time(meal: &str, value: &str) -> Result<NaiveTime, TimerError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| TimerError::InvalidTimeFormat {
        meal: meal.to_string(),
        value: value.to_string(),
    })
}

// ============================================================================
// MealAlertLog
// ============================================================================

/// Which meals have already been announced today.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealAlertLog {
    alerted: BTreeMap<String, bool>,
}

impl MealAlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `meal` was announced today.
    pub fn is_alerted(&self, meal: &str) -> bool {
        self.alerted.get(meal).copied().unwrap_or(false)
    }

    /// Records that `meal` was announced.
    pub fn mark(&mut self, meal: &str) {
        self.alerted.insert(meal.to_string(), true);
    }

    /// Clears every flag.
    pub fn reset(&mut self) {
        self.alerted.clear();
    }
}

// ============================================================================
// MealAlertScheduler
// ============================================================================

/// A meal reminder that should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealAlert {
    pub meal: String,
    pub time: NaiveTime,
}

impl MealAlert {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        format!(
            "It's {} time ({})! Enjoy your meal.",
            self.meal,
            self.time.format("%H:%M")
        )
    }
}

/// Result of one poll.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// The calendar date changed since the stats were last observed
    pub rolled_over: bool,
    /// Reminder to show, at most one per poll
    pub alert: Option<MealAlert>,
    /// Meal times that did not parse; any entry means the poll fired nothing
    pub invalid: Vec<TimerError>,
}

/// Polls the wall clock against the configured meal times.
#[derive(Debug, Default)]
pub struct MealAlertScheduler {
    log: MealAlertLog,
}

impl MealAlertScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns today's alert flags.
    pub fn log(&self) -> &MealAlertLog {
        &self.log
    }

    /// Detects day rollover and resets the alert flags with the stats.
    pub fn observe_date(&mut self, now: NaiveDateTime, stats: &mut StatsAccumulator) -> bool {
        let rolled_over = stats.roll_over_if_needed(now.date());
        if rolled_over {
            self.log.reset();
        }
        rolled_over
    }

    /// Runs one poll at wall-clock time `now`.
    pub fn poll(
        &mut self,
        now: NaiveDateTime,
        config: &TimerConfig,
        stats: &mut StatsAccumulator,
    ) -> PollOutcome {
        let mut outcome = PollOutcome {
            rolled_over: self.observe_date(now, stats),
            ..PollOutcome::default()
        };

        if !config.meal_alert_enabled {
            return outcome;
        }

        let mut times = Vec::with_capacity(config.meal_times.len());
        for (meal, raw) in &config.meal_times {
            match parse_meal_time(meal, raw) {
                Ok(time) => times.push((meal, time)),
                Err(err) => {
                    tracing::warn!(%meal, value = %raw, "Invalid meal time, skipping this check");
                    outcome.invalid.push(err);
                }
            }
        }
        if !outcome.invalid.is_empty() {
            return outcome;
        }

        for (meal, time) in times {
            if time.hour() == now.hour()
                && time.minute() == now.minute()
                && !self.log.is_alerted(meal)
            {
                self.log.mark(meal);
                tracing::info!(%meal, "Meal alert");
                outcome.alert = Some(MealAlert {
                    meal: meal.clone(),
                    time,
                });
                break;
            }
        }

        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DailyStats;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, day)
            .unwrap()
            .and_hms_opt(hour, minute, 30)
            .unwrap()
    }

    fn stats_for(day: u32) -> StatsAccumulator {
        StatsAccumulator::new(DailyStats::new(NaiveDate::from_ymd_opt(2026, 6, day).unwrap()))
    }

    fn config_with_meals(meals: &[(&str, &str)]) -> TimerConfig {
        TimerConfig {
            meal_times: meals
                .iter()
                .map(|(name, time)| (name.to_string(), time.to_string()))
                .collect(),
            ..TimerConfig::default()
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_valid() {
            assert_eq!(
                parse_meal_time("lunch", "12:00").unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap()
            );
            assert_eq!(
                parse_meal_time("dinner", " 17:30 ").unwrap(),
                NaiveTime::from_hms_opt(17, 30, 0).unwrap()
            );
        }

        #[test]
        fn test_parse_invalid() {
            for value in ["noon", "25:00", "12:61", "", "12"] {
                let err = parse_meal_time("lunch", value).unwrap_err();
                assert!(
                    matches!(err, TimerError::InvalidTimeFormat { ref meal, .. } if meal == "lunch"),
                    "expected InvalidTimeFormat for {value:?}"
                );
            }
        }
    }

    mod poll_tests {
        use super::*;

        #[test]
        fn test_alert_fires_once_per_minute() {
            let mut scheduler = MealAlertScheduler::new();
            let mut stats = stats_for(1);
            let config = config_with_meals(&[("lunch", "12:00")]);

            let first = scheduler.poll(at(1, 12, 0), &config, &mut stats);
            let alert = first.alert.expect("lunch alert");
            assert_eq!(alert.meal, "lunch");
            assert!(scheduler.log().is_alerted("lunch"));

            let second = scheduler.poll(at(1, 12, 0), &config, &mut stats);
            assert!(second.alert.is_none());
        }

        #[test]
        fn test_no_alert_outside_the_minute() {
            let mut scheduler = MealAlertScheduler::new();
            let mut stats = stats_for(1);
            let config = config_with_meals(&[("lunch", "12:00")]);

            assert!(scheduler.poll(at(1, 11, 59), &config, &mut stats).alert.is_none());
            assert!(scheduler.poll(at(1, 12, 1), &config, &mut stats).alert.is_none());
            assert!(!scheduler.log().is_alerted("lunch"));
        }

        #[test]
        fn test_disabled_alerts_never_fire() {
            let mut scheduler = MealAlertScheduler::new();
            let mut stats = stats_for(1);
            let config = TimerConfig {
                meal_alert_enabled: false,
                ..config_with_meals(&[("lunch", "12:00")])
            };

            assert!(scheduler.poll(at(1, 12, 0), &config, &mut stats).alert.is_none());
        }

        #[test]
        fn test_at_most_one_alert_per_poll() {
            let mut scheduler = MealAlertScheduler::new();
            let mut stats = stats_for(1);
            let config = config_with_meals(&[("lunch", "12:00"), ("snack", "12:00")]);

            let first = scheduler.poll(at(1, 12, 0), &config, &mut stats);
            let second = scheduler.poll(at(1, 12, 0), &config, &mut stats);
            let third = scheduler.poll(at(1, 12, 0), &config, &mut stats);

            assert!(first.alert.is_some());
            assert!(second.alert.is_some());
            assert_ne!(first.alert, second.alert);
            assert!(third.alert.is_none());
        }

        #[test]
        fn test_invalid_time_skips_the_whole_check() {
            let mut scheduler = MealAlertScheduler::new();
            let mut stats = stats_for(1);
            let config = config_with_meals(&[("brunch", "late"), ("lunch", "12:00")]);

            let outcome = scheduler.poll(at(1, 12, 0), &config, &mut stats);

            assert_eq!(outcome.invalid.len(), 1);
            assert!(outcome.alert.is_none());
            assert!(!scheduler.log().is_alerted("lunch"));
        }

        #[test]
        fn test_fixed_time_fires_on_next_check() {
            let mut scheduler = MealAlertScheduler::new();
            let mut stats = stats_for(1);
            let mut config = config_with_meals(&[("brunch", "late"), ("lunch", "12:00")]);
            scheduler.poll(at(1, 12, 0), &config, &mut stats);

            config.meal_times.insert("brunch".to_string(), "10:30".to_string());
            let outcome = scheduler.poll(at(1, 12, 0), &config, &mut stats);

            assert!(outcome.invalid.is_empty());
            assert_eq!(outcome.alert.map(|a| a.meal), Some("lunch".to_string()));
        }

        #[test]
        fn test_day_rollover_resets_stats_and_flags() {
            let mut scheduler = MealAlertScheduler::new();
            let mut stats = StatsAccumulator::new(DailyStats {
                date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                total_work_seconds: 1500,
                completed_cycles: 2,
            });
            let config = config_with_meals(&[("lunch", "12:00")]);
            scheduler.poll(at(1, 12, 0), &config, &mut stats);
            assert!(scheduler.log().is_alerted("lunch"));

            let outcome = scheduler.poll(at(2, 0, 0), &config, &mut stats);

            assert!(outcome.rolled_over);
            assert_eq!(stats.snapshot().total_work_seconds, 0);
            assert_eq!(stats.snapshot().completed_cycles, 0);
            assert!(!scheduler.log().is_alerted("lunch"));

            let lunch = scheduler.poll(at(2, 12, 0), &config, &mut stats);
            assert!(lunch.alert.is_some());
        }

        #[test]
        fn test_rollover_detected_even_when_alerts_disabled() {
            let mut scheduler = MealAlertScheduler::new();
            let mut stats = stats_for(1);
            stats.commit_work(60);
            let config = TimerConfig {
                meal_alert_enabled: false,
                ..TimerConfig::default()
            };

            let outcome = scheduler.poll(at(2, 9, 0), &config, &mut stats);

            assert!(outcome.rolled_over);
            assert_eq!(stats.snapshot().total_work_seconds, 0);
        }

        #[test]
        fn test_alert_message() {
            let alert = MealAlert {
                meal: "dinner".into(),
                time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            };
            assert_eq!(alert.message(), "It's dinner time (17:30)! Enjoy your meal.");
        }
    }
}
