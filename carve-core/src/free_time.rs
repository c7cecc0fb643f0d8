//! Free-time normalizer and the owned free-time state of one pass.
//!
//! Raw input comes from the calendar layer: the full free list, and the part of
//! it that falls in working hours. Normalized state keeps two sorted, merged,
//! mutually disjoint sequences clipped to the day bounds:
//!
//! - `work` = free ∩ freeDuringWork ∩ bounds
//! - `free` = (free ∩ bounds) − work
//!
//! Upstream drift (intervals outside the bounds, work time that is not free) is
//! clipped away and kept as a warning instead of failing the pass. Both
//! sequences are shrunk to whole minutes, since durations are counted in minutes.

use serde::Serialize;
use tracing::warn;

use crate::day::DayBounds;
use crate::error::ScheduleError;
use crate::interval::{merge, subtract_all, Interval, SlotKind, TypedInterval};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeTime {
    bounds: DayBounds,
    free: Vec<Interval>,
    work: Vec<Interval>,
    #[serde(skip)]
    warnings: Vec<ScheduleError>,
}

impl FreeTime {
    pub fn normalize(bounds: DayBounds, raw_free: &[Interval], raw_work: &[Interval]) -> Self {
        let mut warnings = Vec::new();

        let all_free = merge(clip_to_bounds(&bounds, raw_free, "free", &mut warnings));
        let work_in_day = merge(clip_to_bounds(&bounds, raw_work, "work", &mut warnings));

        let mut work = Vec::new();
        for w in &work_in_day {
            if w.covered_minutes(&all_free) < w.duration_minutes() {
                warnings.push(drift(format!(
                    "work interval {} -> {} is not fully free",
                    w.start(),
                    w.end()
                )));
            }
            work.extend(all_free.iter().filter_map(|f| w.clip(f)));
        }
        let work = merge(work);

        let free = work
            .iter()
            .fold(all_free, |remaining, w| subtract_all(&remaining, w));

        let work: Vec<Interval> = work.iter().filter_map(Interval::snap_to_minutes).collect();
        let free: Vec<Interval> = free.iter().filter_map(Interval::snap_to_minutes).collect();

        for w in &warnings {
            warn!(day = %bounds.day, "{w}");
        }

        Self {
            bounds,
            free,
            work,
            warnings,
        }
    }

    pub fn bounds(&self) -> &DayBounds {
        &self.bounds
    }

    pub fn sequence(&self, kind: SlotKind) -> &[Interval] {
        match kind {
            SlotKind::Free => &self.free,
            SlotKind::Work => &self.work,
        }
    }

    /// Recovered inconsistencies found while normalizing.
    pub fn warnings(&self) -> &[ScheduleError] {
        &self.warnings
    }

    /// Eligible slots in time order. Work slots only when `include_work`.
    pub fn slots(&self, include_work: bool) -> Vec<TypedInterval> {
        let mut out: Vec<TypedInterval> = self
            .free
            .iter()
            .map(|iv| TypedInterval::new(*iv, SlotKind::Free))
            .collect();
        if include_work {
            out.extend(self.work.iter().map(|iv| TypedInterval::new(*iv, SlotKind::Work)));
        }
        out.sort_by_key(|t| (t.interval.start(), t.kind));
        out
    }

    /// True when `interval` still sits entirely inside one slot of `kind`.
    pub fn is_free(&self, interval: &Interval, kind: SlotKind) -> bool {
        self.sequence(kind).iter().any(|slot| slot.contains(interval))
    }

    /// Remove a committed interval from both sequences.
    pub fn carve(&mut self, interval: &Interval) {
        self.free = subtract_all(&self.free, interval);
        self.work = subtract_all(&self.work, interval);
    }

    pub fn total_minutes(&self, kind: SlotKind) -> i64 {
        self.sequence(kind).iter().map(Interval::duration_minutes).sum()
    }

    /// No free or work time left to hand out.
    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty() && self.work.is_empty()
    }
}

fn clip_to_bounds(
    bounds: &DayBounds,
    raw: &[Interval],
    label: &str,
    warnings: &mut Vec<ScheduleError>,
) -> Vec<Interval> {
    raw.iter()
        .filter_map(|iv| {
            let clipped = iv.clip(&bounds.span);
            if clipped != Some(*iv) {
                warnings.push(drift(format!(
                    "{label} interval {} -> {} falls outside wake/sleep bounds",
                    iv.start(),
                    iv.end()
                )));
            }
            clipped
        })
        .collect()
}

fn drift(reason: String) -> ScheduleError {
    ScheduleError::InconsistentFreeTime { reason }
}
