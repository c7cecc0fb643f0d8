//! Explanation records: one per committed allocation, for external rendering.
//!
//! The engine never writes prose. A record carries the scored candidate exactly
//! as it won the pool, plus what was actually committed.

use serde::{Deserialize, Serialize};

use crate::allocator::Allocation;
use crate::interval::Interval;
use crate::scoring::{Factor, ScoredInterval};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRecord {
    pub goal_id: String,
    /// Committed interval; may be shorter than `scored.candidate.interval`.
    pub interval: Interval,
    pub scored: ScoredInterval,
    /// Factor with the largest weighted contribution.
    pub dominant_factor: Option<Factor>,
    /// The session was cut short to the goal's remaining commitment.
    pub shrunk_to_commitment: bool,
}

pub fn compose(allocation: &Allocation, scored: ScoredInterval) -> ExplanationRecord {
    let dominant_factor = scored
        .explanation
        .iter()
        .max_by(|a, b| a.contribution.total_cmp(&b.contribution))
        .map(|f| f.factor);
    ExplanationRecord {
        goal_id: allocation.goal_id.clone(),
        interval: allocation.interval,
        shrunk_to_commitment: allocation.interval != scored.candidate.interval,
        dominant_factor,
        scored,
    }
}

impl ExplanationRecord {
    /// Factors sorted by contribution, largest first.
    pub fn ranked_factors(&self) -> Vec<(Factor, f64)> {
        let mut out: Vec<_> = self
            .scored
            .explanation
            .iter()
            .map(|f| (f.factor, f.contribution))
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }
}
