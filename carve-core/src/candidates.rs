//! Candidate generation: where could one session of a goal go today?
//!
//! Re-run for a goal after each of its commits, because free time, break zones
//! and the per-day cap all change.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::day::DayBounds;
use crate::error::Result;
use crate::free_time::FreeTime;
use crate::goal::{RankedWindow, SchedulableGoal};
use crate::interval::{subtract_all, Interval, SlotKind};

/// A prospective, uncommitted placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub goal_id: String,
    pub interval: Interval,
    pub source_kind: SlotKind,
    /// Rank of the preferred window this came from; `None` without preferences.
    pub window_rank: Option<usize>,
}

/// The allocator's working view of one goal during a pass.
#[derive(Debug, Clone)]
pub struct GoalContext<'g> {
    pub goal: &'g SchedulableGoal,
    /// Applicable preferred windows today. Empty means no preference.
    pub windows: Vec<RankedWindow>,
    pub remaining_minutes: i64,
    /// This goal's allocations so far in the pass.
    pub committed: Vec<Interval>,
}

impl<'g> GoalContext<'g> {
    pub fn new(goal: &'g SchedulableGoal, bounds: &DayBounds) -> Result<Self> {
        Ok(Self {
            goal,
            windows: goal.preferred_times.for_day(bounds.day)?,
            remaining_minutes: goal.remaining_minutes(),
            committed: Vec::new(),
        })
    }

    pub fn has_preference(&self) -> bool {
        !self.windows.is_empty()
    }

    /// Preferred windows, or the whole day when the goal has none.
    pub fn preference_intervals(&self, bounds: &DayBounds) -> Vec<Interval> {
        if self.has_preference() {
            crate::interval::merge(self.windows.iter().map(|w| w.interval).collect())
        } else {
            vec![bounds.span]
        }
    }

    /// Whether another session could still be placed at all.
    pub fn wants_more(&self) -> bool {
        self.remaining_minutes >= self.goal.minimum_duration
            && (self.goal.allow_multiple_per_day || self.committed.is_empty())
    }

    /// Zones around committed sessions that another session may not enter.
    pub fn break_zones(&self) -> Vec<Interval> {
        let pad = self.goal.break_minutes();
        if pad == 0 {
            return Vec::new();
        }
        self.committed.iter().map(|c| c.widen(pad)).collect()
    }

    pub fn record_commit(&mut self, interval: Interval) {
        self.remaining_minutes -= interval.duration_minutes();
        self.committed.push(interval);
    }
}

/// Enumerate placements of one session of `ctx.goal` in the current free time.
pub fn generate(ctx: &GoalContext<'_>, free_time: &FreeTime) -> Vec<Candidate> {
    let goal = ctx.goal;
    if !ctx.wants_more() {
        return Vec::new();
    }

    let windows: Vec<(Interval, Option<usize>)> = if ctx.has_preference() {
        ctx.windows.iter().map(|w| (w.interval, Some(w.rank))).collect()
    } else {
        vec![(free_time.bounds().span, None)]
    };
    let zones = ctx.break_zones();

    let mut out: Vec<Candidate> = Vec::new();
    for slot in free_time.slots(goal.can_do_during_work) {
        for (window, rank) in &windows {
            let Some(piece) = slot.interval.clip(window) else {
                continue;
            };
            let pieces = zones
                .iter()
                .fold(vec![piece], |acc, zone| subtract_all(&acc, zone));

            for piece in pieces.iter().filter_map(Interval::snap_to_minutes) {
                if piece.duration_minutes() < goal.minimum_duration {
                    continue;
                }
                let interval = piece.truncate(goal.maximum_duration);
                if zones.iter().any(|z| z.overlaps(&interval)) {
                    continue;
                }
                // Overlapping windows can yield the same placement twice; keep the better rank.
                if out
                    .iter()
                    .any(|c| c.interval == interval && c.source_kind == slot.kind)
                {
                    continue;
                }
                out.push(Candidate {
                    goal_id: goal.id.clone(),
                    interval,
                    source_kind: slot.kind,
                    window_rank: *rank,
                });
            }
        }
    }

    debug!(goal_id = %goal.id, count = out.len(), "generated candidates");
    out
}
