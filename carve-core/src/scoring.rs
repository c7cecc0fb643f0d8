//! Candidate scoring.
//!
//! A score is a weighted sum of named factors. Every factor's raw value and
//! weighted contribution is kept, in evaluation order, so a downstream renderer
//! can explain the choice without re-deriving it.

use serde::{Deserialize, Serialize};

use crate::candidates::{Candidate, GoalContext};
use crate::day::DayBounds;
use crate::error::{Result, ScheduleError};
use crate::goal::Priority;

/// Tunable factor weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Multiplier on the priority weight (High=3, Medium=2, Low=1).
    pub priority: f64,
    pub preference: f64,
    pub preference_rank: f64,
    pub duration_fit: f64,
    pub earliness: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            priority: 10.0,
            preference: 3.0,
            preference_rank: 1.0,
            duration_fit: 2.0,
            earliness: 0.5,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("priority", self.priority),
            ("preference", self.preference),
            ("preference_rank", self.preference_rank),
            ("duration_fit", self.duration_fit),
            ("earliness", self.earliness),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(ScheduleError::InvalidConfig {
                    reason: format!("weight '{name}' must be a finite number >= 0, got {w}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    Priority,
    PreferenceMatch,
    PreferenceRank,
    DurationFit,
    Earliness,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub raw: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl FactorContribution {
    fn new(factor: Factor, raw: f64, weight: f64) -> Self {
        Self {
            factor,
            raw,
            weight,
            contribution: raw * weight,
        }
    }
}

/// A candidate with its score and the factors behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredInterval {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub priority: Priority,
    pub score: f64,
    pub explanation: Vec<FactorContribution>,
}

#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoringWeights,
    bounds: DayBounds,
}

impl Scorer {
    pub fn new(weights: ScoringWeights, bounds: DayBounds) -> Self {
        Self { weights, bounds }
    }

    pub fn score(&self, candidate: Candidate, ctx: &GoalContext<'_>) -> ScoredInterval {
        let w = &self.weights;
        let goal = ctx.goal;
        let interval = candidate.interval;
        let minutes = interval.duration_minutes() as f64;

        let preference_match = if ctx.has_preference() {
            interval.covered_minutes(&ctx.preference_intervals(&self.bounds)) as f64 / minutes
        } else {
            1.0
        };

        let rank = candidate
            .window_rank
            .map_or(1.0, |r| 1.0 / (1.0 + r as f64));

        let ideal = goal.ideal_duration();
        let fit = (1.0 - (minutes - ideal).abs() / ideal).clamp(0.0, 1.0);

        let offset = (interval.start() - self.bounds.span.start()).num_minutes() as f64;
        let day = self.bounds.minutes().max(1) as f64;
        let earliness = (1.0 - offset / day).clamp(0.0, 1.0);

        let explanation = vec![
            FactorContribution::new(Factor::Priority, goal.priority.weight(), w.priority),
            FactorContribution::new(Factor::PreferenceMatch, preference_match, w.preference),
            FactorContribution::new(Factor::PreferenceRank, rank, w.preference_rank),
            FactorContribution::new(Factor::DurationFit, fit, w.duration_fit),
            FactorContribution::new(Factor::Earliness, earliness, w.earliness),
        ];
        let score = explanation.iter().map(|f| f.contribution).sum();

        ScoredInterval {
            candidate,
            priority: goal.priority,
            score,
            explanation,
        }
    }
}
