//! The scheduling day: its wake/sleep bounds and weekday key resolution.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::interval::Interval;

/// Key under which a goal declares preferred windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayKey {
    Everyday,
    Weekdays,
    Weekends,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayKey {
    pub const ALL: [DayKey; 10] = [
        DayKey::Everyday,
        DayKey::Weekdays,
        DayKey::Weekends,
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
        DayKey::Sunday,
    ];

    pub fn for_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayKey::Monday,
            Weekday::Tue => DayKey::Tuesday,
            Weekday::Wed => DayKey::Wednesday,
            Weekday::Thu => DayKey::Thursday,
            Weekday::Fri => DayKey::Friday,
            Weekday::Sat => DayKey::Saturday,
            Weekday::Sun => DayKey::Sunday,
        }
    }

    /// Keys that apply to `weekday`, most specific first.
    pub fn applicable(weekday: Weekday) -> [DayKey; 3] {
        let group = if is_weekend(weekday) {
            DayKey::Weekends
        } else {
            DayKey::Weekdays
        };
        [DayKey::for_weekday(weekday), group, DayKey::Everyday]
    }

    pub fn applies_to(&self, weekday: Weekday) -> bool {
        Self::applicable(weekday).contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayKey::Everyday => "Everyday",
            DayKey::Weekdays => "Weekdays",
            DayKey::Weekends => "Weekends",
            DayKey::Monday => "Monday",
            DayKey::Tuesday => "Tuesday",
            DayKey::Wednesday => "Wednesday",
            DayKey::Thursday => "Thursday",
            DayKey::Friday => "Friday",
            DayKey::Saturday => "Saturday",
            DayKey::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive. The goal id is unknown here, so callers re-wrap the error.
impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        DayKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown weekday key '{s}'"))
    }
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WakeSleepKind {
    WakeUp,
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeSleepEvent {
    #[serde(rename = "type")]
    pub kind: WakeSleepKind,
    pub time: NaiveDateTime,
}

/// The schedulable span of one day, `[wakeUp, sleep)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBounds {
    pub day: NaiveDate,
    pub span: Interval,
}

impl DayBounds {
    /// Missing wake-up defaults to midnight of `day`; missing sleep to the next midnight.
    pub fn from_events(day: NaiveDate, events: &[WakeSleepEvent]) -> Result<Self> {
        let wake = single_event(events, WakeSleepKind::WakeUp)?;
        let sleep = single_event(events, WakeSleepKind::Sleep)?;

        let midnight = day.and_time(chrono::NaiveTime::MIN);
        let start = wake.unwrap_or(midnight);
        let end = sleep.unwrap_or(midnight + Duration::days(1));
        let span = Interval::with_context(start, end, "wake/sleep bounds")?;
        Ok(Self { day, span })
    }

    pub fn new(day: NaiveDate, span: Interval) -> Self {
        Self { day, span }
    }

    pub fn weekday(&self) -> Weekday {
        self.day.weekday()
    }

    pub fn minutes(&self) -> i64 {
        self.span.duration_minutes()
    }
}

fn single_event(events: &[WakeSleepEvent], kind: WakeSleepKind) -> Result<Option<NaiveDateTime>> {
    let mut found = events.iter().filter(|e| e.kind == kind).map(|e| e.time);
    let first = found.next();
    if found.next().is_some() {
        return Err(ScheduleError::InvalidDayBounds {
            reason: format!("more than one {kind:?} event"),
        });
    }
    Ok(first)
}
