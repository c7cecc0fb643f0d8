//! carve-core: goal allocation engine.
//!
//! Given one day's free time and a set of competing goals, decide which goal
//! gets which slice of time, and why. Pure and synchronous: no I/O, no state
//! across passes.

pub mod allocator;
pub mod candidates;
pub mod day;
pub mod error;
pub mod explain;
pub mod free_time;
pub mod goal;
pub mod interval;
pub mod pool;
pub mod request;
pub mod scoring;

pub use allocator::{Allocation, Allocator, GoalRemainder, PassInput, PassOutcome};
pub use candidates::{generate, Candidate, GoalContext};
pub use day::{DayBounds, DayKey, WakeSleepEvent, WakeSleepKind};
pub use error::{Result, ScheduleError};
pub use explain::{compose, ExplanationRecord};
pub use free_time::FreeTime;
pub use goal::{PreferredTimes, PreferredWindow, Priority, RankedWindow, SchedulableGoal};
pub use interval::{Interval, SlotKind, TypedInterval};
pub use pool::RankedCandidatePool;
pub use request::{DayRequest, GoalSpec, RawInterval, WindowSpec};
pub use scoring::{Factor, FactorContribution, ScoredInterval, Scorer, ScoringWeights};

/// Validate a wire request and run one scheduling pass over it.
pub fn plan_day(request: DayRequest, weights: ScoringWeights) -> Result<PassOutcome> {
    let pass = request.into_pass()?;
    Allocator::new(weights).run(&pass)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn passes_can_run_on_worker_threads() {
        assert_send_sync::<Allocator>();
        assert_send_sync::<PassInput>();
        assert_send_sync::<PassOutcome>();
    }

    #[test]
    fn plan_day_runs_end_to_end() {
        let req: DayRequest = serde_json::from_str(
            r#"{
                "day": "2026-10-17",
                "free": [{"start": "2026-10-17T10:00:00", "end": "2026-10-17T12:00:00"}],
                "goals": [{"id": "hike", "remainingCommitment": 1.0,
                           "minimumDuration": 60, "maximumDuration": 90,
                           "priority": "Medium",
                           "preferredTimes": {"Weekends": [{"start": "11:00", "end": "14:00"}]}}]
            }"#,
        )
        .unwrap();
        let out = plan_day(req, ScoringWeights::default()).unwrap();
        assert_eq!(out.allocations.len(), 1);
        let iv = out.allocations[0].interval;
        assert_eq!(iv.start().format("%H:%M").to_string(), "11:00");
        assert_eq!(iv.duration_minutes(), 60);
        assert!(out.warnings.is_empty());
    }
}
