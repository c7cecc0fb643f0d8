//! Half-open wall-clock intervals and the arithmetic the allocator needs.
//!
//! All operations are pure. An `Interval` can only be built with `start < end`,
//! so zero-length or inverted intervals never exist inside the engine.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// `[start, end)` within one scheduling day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "IntervalParts")]
pub struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct IntervalParts {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<IntervalParts> for Interval {
    type Error = ScheduleError;

    fn try_from(parts: IntervalParts) -> Result<Self> {
        Interval::new(parts.start, parts.end)
    }
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        Self::with_context(start, end, "interval")
    }

    /// Like `new`, but tags the error with where the interval came from.
    pub fn with_context(
        start: NaiveDateTime,
        end: NaiveDateTime,
        context: impl Into<String>,
    ) -> Result<Self> {
        if start >= end {
            return Err(ScheduleError::InvalidInterval {
                start,
                end,
                context: context.into(),
            });
        }
        Ok(Self { start, end })
    }

    /// `minutes` long, beginning at `start`. `None` unless `minutes > 0` and the
    /// end is representable.
    pub fn starting_at(start: NaiveDateTime, minutes: i64) -> Option<Self> {
        if minutes <= 0 {
            return None;
        }
        let end = start.checked_add_signed(Duration::try_minutes(minutes)?)?;
        Some(Self { start, end })
    }

    // `None` for empty or inverted bounds.
    fn raw(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whole minutes, rounded down.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the two intervals overlap or share an endpoint.
    pub fn touches(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Intersection with `bound`, or `None` when disjoint.
    pub fn clip(&self, bound: &Interval) -> Option<Interval> {
        Self::raw(self.start.max(bound.start), self.end.min(bound.end))
    }

    /// `self` minus `other`: zero, one or two pieces, in time order.
    pub fn subtract(&self, other: &Interval) -> Vec<Interval> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        Self::raw(self.start, other.start)
            .into_iter()
            .chain(Self::raw(other.end, self.end))
            .collect()
    }

    /// Keep at most `max_minutes`, anchored at the start.
    pub fn truncate(&self, max_minutes: i64) -> Interval {
        match Duration::try_minutes(max_minutes) {
            Some(max) if max_minutes > 0 && self.end - self.start > max => Self {
                start: self.start,
                end: self.start + max,
            },
            _ => *self,
        }
    }

    /// Grow both ends by `minutes`, saturating at the representable range.
    pub fn widen(&self, minutes: i64) -> Interval {
        let pad = Duration::try_minutes(minutes.max(0));
        Self {
            start: pad
                .and_then(|p| self.start.checked_sub_signed(p))
                .unwrap_or(NaiveDateTime::MIN),
            end: pad
                .and_then(|p| self.end.checked_add_signed(p))
                .unwrap_or(NaiveDateTime::MAX),
        }
    }

    /// Shrink inward to whole-minute boundaries. `None` when less than one
    /// aligned minute remains.
    pub fn snap_to_minutes(&self) -> Option<Interval> {
        let floor_start = floor_minute(self.start);
        let start = if floor_start == self.start {
            self.start
        } else {
            floor_start.checked_add_signed(Duration::minutes(1))?
        };
        Self::raw(start, floor_minute(self.end))
    }

    /// Minutes of `self` covered by `others`. `others` must be disjoint.
    pub fn covered_minutes(&self, others: &[Interval]) -> i64 {
        others
            .iter()
            .filter_map(|o| self.clip(o))
            .map(|c| c.duration_minutes())
            .sum()
    }
}

fn floor_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Sort and merge overlapping or adjacent intervals.
pub fn merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort();
    let mut out: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match out.last_mut() {
            Some(last) if last.touches(&iv) => last.end = last.end.max(iv.end),
            _ => out.push(iv),
        }
    }
    out
}

/// Remove `cut` from every interval of a sorted, disjoint sequence.
pub fn subtract_all(seq: &[Interval], cut: &Interval) -> Vec<Interval> {
    seq.iter().flat_map(|iv| iv.subtract(cut)).collect()
}

/// Where a free slot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Free time outside working hours.
    Free,
    /// Free time that falls inside working hours.
    Work,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedInterval {
    pub interval: Interval,
    pub kind: SlotKind,
}

impl TypedInterval {
    pub fn new(interval: Interval, kind: SlotKind) -> Self {
        Self { interval, kind }
    }
}
