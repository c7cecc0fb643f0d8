//! Allocator: greedy best-first assignment of free time to goals.
//!
//! Algorithm (deterministic, single pass, no backtracking):
//! 1) validate every goal, weight and interval; fail before anything is committed
//! 2) seed the pool with scored candidates for every goal that still owes time
//! 3) pop the best candidate; stop when the pool is empty
//! 4) re-check it against current free time, break zones and commitment
//!    - no longer free: regenerate that goal against what remains
//!    - commitment below the minimum session: drop the goal
//! 5) shrink to the remaining commitment if needed, commit, carve free time
//! 6) regenerate the committed goal's candidates and go to 3

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::candidates::{generate, GoalContext};
use crate::day::DayBounds;
use crate::error::{Result, ScheduleError};
use crate::explain::{compose, ExplanationRecord};
use crate::free_time::FreeTime;
use crate::goal::SchedulableGoal;
use crate::interval::{Interval, SlotKind};
use crate::pool::RankedCandidatePool;
use crate::scoring::{ScoredInterval, Scorer, ScoringWeights};

/// A committed placement of one goal session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub goal_id: String,
    pub interval: Interval,
    pub source_kind: SlotKind,
}

/// How much of a goal's commitment this pass satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRemainder {
    pub goal_id: String,
    pub requested_minutes: i64,
    pub allocated_minutes: i64,
    pub unsatisfied_minutes: i64,
}

/// Everything one pass needs, already resolved to a single wall-clock day.
#[derive(Debug, Clone, PartialEq)]
pub struct PassInput {
    pub bounds: DayBounds,
    pub free: Vec<Interval>,
    pub free_during_work: Vec<Interval>,
    pub goals: Vec<SchedulableGoal>,
}

impl PassInput {
    pub fn new(bounds: DayBounds, free: Vec<Interval>, free_during_work: Vec<Interval>) -> Self {
        Self {
            bounds,
            free,
            free_during_work,
            goals: Vec::new(),
        }
    }

    pub fn with_goal(mut self, goal: SchedulableGoal) -> Self {
        self.goals.push(goal);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassOutcome {
    /// Commit order.
    pub allocations: Vec<Allocation>,
    /// Parallel to `allocations`.
    pub explanations: Vec<ExplanationRecord>,
    /// One per input goal, in input order.
    pub remaining: Vec<GoalRemainder>,
    /// Free-time inconsistencies recovered by clipping.
    pub warnings: Vec<String>,
}

impl PassOutcome {
    pub fn allocations_for<'a>(&'a self, goal_id: &'a str) -> impl Iterator<Item = &'a Allocation> {
        self.allocations.iter().filter(move |a| a.goal_id == goal_id)
    }

    pub fn unsatisfied(&self) -> impl Iterator<Item = &GoalRemainder> {
        self.remaining.iter().filter(|r| r.unsatisfied_minutes > 0)
    }

    pub fn summary(&self) -> String {
        let minutes: i64 = self.remaining.iter().map(|r| r.allocated_minutes).sum();
        let unsatisfied: Vec<_> = self.unsatisfied().collect();
        let short: i64 = unsatisfied.iter().map(|r| r.unsatisfied_minutes).sum();
        format!(
            "allocated {} sessions ({} min) for {} goals; {} goals unsatisfied ({} min short)",
            self.allocations.len(),
            minutes,
            self.remaining.len(),
            unsatisfied.len(),
            short
        )
    }
}

/// Runs scheduling passes. Holds only configuration, so one instance can
/// serve any number of independent passes, on any thread.
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    weights: ScoringWeights,
}

impl Allocator {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn run(&self, input: &PassInput) -> Result<PassOutcome> {
        let mut contexts = self.validate(input)?;
        let index: BTreeMap<&str, usize> = input
            .goals
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id.as_str(), i))
            .collect();

        let mut free_time = FreeTime::normalize(input.bounds, &input.free, &input.free_during_work);
        let scorer = Scorer::new(self.weights, input.bounds);
        let mut pool = RankedCandidatePool::new();

        for ctx in contexts.iter().filter(|c| c.goal.remaining_commitment > 0.0) {
            pool.extend(scored_candidates(ctx, &free_time, &scorer));
        }
        debug!(day = %input.bounds.day, pending = pool.len(), "seeded candidate pool");

        let mut allocations = Vec::new();
        let mut explanations = Vec::new();

        while let Some(best) = pool.pop_best() {
            let Some(&i) = index.get(best.candidate.goal_id.as_str()) else {
                continue;
            };
            let ctx = &mut contexts[i];
            let goal: &SchedulableGoal = ctx.goal;
            let goal_id = goal.id.as_str();
            let offered = best.candidate.interval;

            if !ctx.wants_more() {
                let dropped = pool.remove_all_for(goal_id);
                debug!(goal_id, dropped, "goal is done for the day");
                continue;
            }

            let still_free = free_time.is_free(&offered, best.candidate.source_kind)
                && !ctx.break_zones().iter().any(|z| z.overlaps(&offered));
            if !still_free {
                pool.remove_all_for(goal_id);
                let fresh = scored_candidates(ctx, &free_time, &scorer);
                debug!(goal_id, regenerated = fresh.len(), "stale candidate discarded");
                pool.extend(fresh);
                continue;
            }

            let interval = if ctx.remaining_minutes < offered.duration_minutes() {
                Interval::starting_at(offered.start(), ctx.remaining_minutes).unwrap_or(offered)
            } else {
                offered
            };

            free_time.carve(&interval);
            ctx.record_commit(interval);
            debug!(
                goal_id,
                start = %interval.start(),
                end = %interval.end(),
                score = best.score,
                remaining = ctx.remaining_minutes,
                "committed"
            );

            let allocation = Allocation {
                goal_id: goal_id.to_string(),
                interval,
                source_kind: best.candidate.source_kind,
            };
            explanations.push(compose(&allocation, best));
            allocations.push(allocation);

            if free_time.is_exhausted() {
                debug!(pending = pool.len(), "free time exhausted");
                break;
            }
            pool.remove_all_for(goal_id);
            pool.extend(scored_candidates(ctx, &free_time, &scorer));
        }

        let remaining: Vec<GoalRemainder> = contexts
            .iter()
            .map(|ctx| {
                let requested = ctx.goal.remaining_minutes();
                let allocated = requested - ctx.remaining_minutes;
                GoalRemainder {
                    goal_id: ctx.goal.id.clone(),
                    requested_minutes: requested,
                    allocated_minutes: allocated,
                    unsatisfied_minutes: ctx.remaining_minutes.max(0),
                }
            })
            .collect();

        let outcome = PassOutcome {
            allocations,
            explanations,
            remaining,
            warnings: free_time.warnings().iter().map(ToString::to_string).collect(),
        };
        info!(day = %input.bounds.day, "{}", outcome.summary());
        Ok(outcome)
    }

    fn validate<'g>(&self, input: &'g PassInput) -> Result<Vec<GoalContext<'g>>> {
        self.weights.validate()?;

        let mut seen = BTreeSet::new();
        let mut contexts = Vec::with_capacity(input.goals.len());
        for goal in &input.goals {
            goal.validate(input.bounds.day)?;
            if !seen.insert(goal.id.as_str()) {
                return Err(ScheduleError::invalid_goal(&goal.id, "duplicate goal id"));
            }
            contexts.push(GoalContext::new(goal, &input.bounds)?);
        }
        Ok(contexts)
    }
}

fn scored_candidates(
    ctx: &GoalContext<'_>,
    free_time: &FreeTime,
    scorer: &Scorer,
) -> Vec<ScoredInterval> {
    generate(ctx, free_time)
        .into_iter()
        .map(|c| scorer.score(c, ctx))
        .collect()
}
