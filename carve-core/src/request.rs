//! Wire types for a day request, as handed over by the calendar/goal query layer.
//!
//! Everything here is unvalidated. `DayRequest::into_pass` turns it into a
//! `PassInput` or fails with the first validation error it meets, so a bad
//! request never reaches the allocator.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::allocator::PassInput;
use crate::day::{DayBounds, WakeSleepEvent};
use crate::error::{Result, ScheduleError};
use crate::goal::{PreferredTimes, PreferredWindow, Priority, SchedulableGoal};
use crate::interval::Interval;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRequest {
    pub day: NaiveDate,
    #[serde(default)]
    pub events: Vec<WakeSleepEvent>,
    #[serde(default)]
    pub free: Vec<RawInterval>,
    #[serde(default)]
    pub free_during_work: Vec<RawInterval>,
    #[serde(default)]
    pub goals: Vec<GoalSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Time-of-day window as text, `HH:MM` or `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSpec {
    pub id: String,
    pub remaining_commitment: f64,
    pub minimum_duration: i64,
    pub maximum_duration: i64,
    pub priority: Priority,
    #[serde(default)]
    pub allow_multiple_per_day: bool,
    #[serde(default)]
    pub can_do_during_work: bool,
    #[serde(default)]
    pub break_duration: Option<i64>,
    #[serde(default)]
    pub preferred_times: BTreeMap<String, Vec<WindowSpec>>,
}

impl DayRequest {
    pub fn into_pass(self) -> Result<PassInput> {
        let bounds = DayBounds::from_events(self.day, &self.events)?;
        let free = to_intervals(&self.free, "free")?;
        let work = to_intervals(&self.free_during_work, "freeDuringWork")?;

        let mut pass = PassInput::new(bounds, free, work);
        for spec in self.goals {
            let goal = spec.into_goal()?;
            goal.validate(bounds.day)?;
            pass.goals.push(goal);
        }
        Ok(pass)
    }
}

impl GoalSpec {
    pub fn into_goal(self) -> Result<SchedulableGoal> {
        let mut named = Vec::with_capacity(self.preferred_times.len());
        for (key, windows) in self.preferred_times {
            let windows = windows
                .iter()
                .map(|w| parse_window(&self.id, w))
                .collect::<Result<Vec<_>>>()?;
            named.push((key, windows));
        }
        let preferred_times = PreferredTimes::from_named(&self.id, named)?;

        Ok(SchedulableGoal {
            id: self.id,
            remaining_commitment: self.remaining_commitment,
            minimum_duration: self.minimum_duration,
            maximum_duration: self.maximum_duration,
            priority: self.priority,
            allow_multiple_per_day: self.allow_multiple_per_day,
            can_do_during_work: self.can_do_during_work,
            break_duration: self.break_duration,
            preferred_times,
        })
    }
}

fn to_intervals(raw: &[RawInterval], label: &str) -> Result<Vec<Interval>> {
    raw.iter()
        .map(|r| Interval::with_context(r.start, r.end, label))
        .collect()
}

fn parse_window(goal_id: &str, w: &WindowSpec) -> Result<PreferredWindow> {
    Ok(PreferredWindow::new(
        parse_time(goal_id, &w.start)?,
        parse_time(goal_id, &w.end)?,
    ))
}

fn parse_time(goal_id: &str, s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S"))
        .map_err(|_| ScheduleError::invalid_goal(goal_id, format!("invalid time of day '{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayKey;

    const REQUEST: &str = r#"{
        "day": "2026-10-16",
        "events": [
            {"type": "wakeUp", "time": "2026-10-16T07:00:00"},
            {"type": "sleep", "time": "2026-10-16T23:00:00"}
        ],
        "free": [{"start": "2026-10-16T07:00:00", "end": "2026-10-16T12:00:00"}],
        "freeDuringWork": [{"start": "2026-10-16T09:00:00", "end": "2026-10-16T12:00:00"}],
        "goals": [{
            "id": "gym",
            "remainingCommitment": 2.0,
            "minimumDuration": 30,
            "maximumDuration": 60,
            "priority": "High",
            "breakDuration": 30,
            "preferredTimes": {"Weekdays": [{"start": "07:00", "end": "08:30"}]}
        }]
    }"#;

    #[test]
    fn parses_and_converts_a_full_request() {
        let req: DayRequest = serde_json::from_str(REQUEST).unwrap();
        let pass = req.into_pass().unwrap();
        assert_eq!(pass.bounds.minutes(), 16 * 60);
        assert_eq!(pass.free.len(), 1);
        assert_eq!(pass.free_during_work.len(), 1);

        let goal = &pass.goals[0];
        assert_eq!(goal.priority, Priority::High);
        assert!(!goal.allow_multiple_per_day);
        assert_eq!(goal.break_duration, Some(30));
        let windows = goal.preferred_times.for_day(pass.bounds.day).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].interval.duration_minutes(), 90);
        assert_eq!(
            goal.preferred_times,
            PreferredTimes::new().with(
                DayKey::Weekdays,
                PreferredWindow::new(
                    NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(8, 30, 0).unwrap()
                )
            )
        );
    }

    #[test]
    fn zero_length_free_interval_is_rejected() {
        let mut req: DayRequest = serde_json::from_str(REQUEST).unwrap();
        let at = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        req.free.push(RawInterval { start: at, end: at });
        assert!(matches!(
            req.into_pass(),
            Err(ScheduleError::InvalidInterval { ref context, .. }) if context == "free"
        ));
    }

    #[test]
    fn unknown_weekday_key_is_invalid_goal() {
        let json = REQUEST.replace("Weekdays", "Workdays");
        let req: DayRequest = serde_json::from_str(&json).unwrap();
        assert!(matches!(req.into_pass(), Err(ScheduleError::InvalidGoal { .. })));
    }

    #[test]
    fn bad_time_of_day_is_invalid_goal() {
        let json = REQUEST.replace("08:30", "8h30");
        let req: DayRequest = serde_json::from_str(&json).unwrap();
        let err = req.into_pass().unwrap_err();
        assert!(err.to_string().contains("invalid time of day '8h30'"));
    }

    #[test]
    fn seconds_are_optional_in_windows() {
        let json = REQUEST.replace("08:30", "08:30:00");
        let req: DayRequest = serde_json::from_str(&json).unwrap();
        assert!(req.into_pass().is_ok());
    }
}
