//! Goals: the unit of demand in a scheduling pass.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::error::{Result, ScheduleError};
use crate::interval::Interval;

/// Declared low to high so the derived order is `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn weight(&self) -> f64 {
        match self {
            Priority::High => 3.0,
            Priority::Medium => 2.0,
            Priority::Low => 1.0,
        }
    }
}

/// A time-of-day window. Never crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl PreferredWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn resolve(&self, day: NaiveDate) -> Result<Interval> {
        Interval::with_context(
            day.and_time(self.start),
            day.and_time(self.end),
            "preferred window",
        )
    }
}

/// A preferred window resolved onto the pass day, with its rank among all
/// windows that apply today (0 = most preferred).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedWindow {
    pub interval: Interval,
    pub rank: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferredTimes(BTreeMap<DayKey, Vec<PreferredWindow>>);

impl PreferredTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from string keys, rejecting anything that is not a known day key.
    pub fn from_named<I, K>(goal_id: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<PreferredWindow>)>,
        K: AsRef<str>,
    {
        let mut out = Self::new();
        for (name, windows) in entries {
            let key: DayKey = name
                .as_ref()
                .parse()
                .map_err(|reason: String| ScheduleError::invalid_goal(goal_id, reason))?;
            out.0.entry(key).or_default().extend(windows);
        }
        Ok(out)
    }

    pub fn with(mut self, key: DayKey, window: PreferredWindow) -> Self {
        self.0.entry(key).or_default().push(window);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Windows that apply on `day`, most specific key first, declaration order
    /// within a key. Fails if any applicable window is inverted.
    pub fn for_day(&self, day: NaiveDate) -> Result<Vec<RankedWindow>> {
        use chrono::Datelike;

        let mut out = Vec::new();
        for key in DayKey::applicable(day.weekday()) {
            for window in self.0.get(&key).into_iter().flatten() {
                out.push(RankedWindow {
                    interval: window.resolve(day)?,
                    rank: out.len(),
                });
            }
        }
        Ok(out)
    }

    fn validate(&self, day: NaiveDate) -> Result<()> {
        // Non-applicable windows are checked too; a bad Sunday window is bad every day.
        for window in self.0.values().flatten() {
            window.resolve(day)?;
        }
        Ok(())
    }
}

/// A goal as seen by one scheduling pass. Durations are in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulableGoal {
    pub id: String,
    /// Hours still owed this period.
    pub remaining_commitment: f64,
    pub minimum_duration: i64,
    pub maximum_duration: i64,
    pub priority: Priority,
    pub allow_multiple_per_day: bool,
    pub can_do_during_work: bool,
    pub break_duration: Option<i64>,
    #[serde(default)]
    pub preferred_times: PreferredTimes,
}

impl SchedulableGoal {
    pub fn new(id: impl Into<String>, remaining_hours: f64, min: i64, max: i64) -> Self {
        Self {
            id: id.into(),
            remaining_commitment: remaining_hours,
            minimum_duration: min,
            maximum_duration: max,
            priority: Priority::Medium,
            allow_multiple_per_day: false,
            can_do_during_work: false,
            break_duration: None,
            preferred_times: PreferredTimes::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_multiple_per_day(mut self, allow: bool) -> Self {
        self.allow_multiple_per_day = allow;
        self
    }

    pub fn with_work_hours(mut self, allow: bool) -> Self {
        self.can_do_during_work = allow;
        self
    }

    pub fn with_break(mut self, minutes: i64) -> Self {
        self.break_duration = Some(minutes);
        self
    }

    pub fn with_preferred(mut self, key: DayKey, window: PreferredWindow) -> Self {
        self.preferred_times = self.preferred_times.with(key, window);
        self
    }

    /// Remaining commitment in whole minutes, rounded to nearest.
    pub fn remaining_minutes(&self) -> i64 {
        (self.remaining_commitment * 60.0).round() as i64
    }

    /// Midpoint of the duration bounds.
    pub fn ideal_duration(&self) -> f64 {
        (self.minimum_duration + self.maximum_duration) as f64 / 2.0
    }

    pub fn break_minutes(&self) -> i64 {
        self.break_duration.unwrap_or(0).max(0)
    }

    pub fn validate(&self, day: NaiveDate) -> Result<()> {
        let fail = |reason: &str| Err(ScheduleError::invalid_goal(&self.id, reason));

        if self.id.trim().is_empty() {
            return fail("id must be non-empty");
        }
        if self.minimum_duration <= 0 {
            return fail("minimumDuration must be positive");
        }
        if self.maximum_duration < self.minimum_duration {
            return fail("maximumDuration must be >= minimumDuration");
        }
        if !self.remaining_commitment.is_finite() || self.remaining_commitment < 0.0 {
            return fail("remainingCommitment must be a finite number >= 0");
        }
        if self.break_duration.is_some_and(|b| b < 0) {
            return fail("breakDuration must be >= 0");
        }
        self.preferred_times.validate(day)
    }
}
