//! Error types for the allocation engine.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Everything that can stop a scheduling pass before it starts.
///
/// Running out of candidates, free time or commitment is a normal terminal
/// state of the allocator and never shows up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Zero-length or inverted interval.
    #[error("invalid interval {start} -> {end} ({context})")]
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
        context: String,
    },

    /// Goal definition that cannot be scheduled as declared.
    #[error("invalid goal '{goal_id}': {reason}")]
    InvalidGoal { goal_id: String, reason: String },

    /// Free-time input that disagrees with itself or with the day bounds.
    ///
    /// The normalizer recovers from these by clipping and keeps them as warnings.
    #[error("inconsistent free time: {reason}")]
    InconsistentFreeTime { reason: String },

    #[error("invalid day bounds: {reason}")]
    InvalidDayBounds { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl ScheduleError {
    pub(crate) fn invalid_goal(goal_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGoal {
            goal_id: goal_id.into(),
            reason: reason.into(),
        }
    }

    /// True for errors the normalizer recovers from instead of failing the pass.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InconsistentFreeTime { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn messages_name_the_offender() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let err = ScheduleError::InvalidInterval {
            start: at,
            end: at,
            context: "free".to_string(),
        };
        assert!(err.to_string().contains("2026-10-16 10:00:00"));
        assert!(err.to_string().contains("free"));

        let err = ScheduleError::invalid_goal("gym", "minimumDuration must be positive");
        assert_eq!(
            err.to_string(),
            "invalid goal 'gym': minimumDuration must be positive"
        );
    }

    #[test]
    fn only_free_time_drift_is_recoverable() {
        assert!(ScheduleError::InconsistentFreeTime { reason: "x".into() }.is_recoverable());
        assert!(!ScheduleError::invalid_goal("g", "x").is_recoverable());
    }
}
