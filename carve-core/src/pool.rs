//! Ranked candidate pool shared by every goal during one pass.
//!
//! Kept sorted best-first. Ranking:
//! - score DESC
//! - priority DESC (High best)
//! - start ASC
//! - goal id ASC
//! - insertion order (stable: first in, first out)

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::scoring::ScoredInterval;

/// `Less` when `a` should be allocated before `b`.
pub fn ranking(a: &ScoredInterval, b: &ScoredInterval) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.candidate.interval.start().cmp(&b.candidate.interval.start()))
        .then_with(|| a.candidate.goal_id.cmp(&b.candidate.goal_id))
}

#[derive(Debug, Default, Clone)]
pub struct RankedCandidatePool {
    entries: VecDeque<ScoredInterval>,
}

impl RankedCandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binary-search insert; lands after every entry that ranks equal.
    pub fn insert(&mut self, scored: ScoredInterval) {
        let at = self
            .entries
            .partition_point(|e| ranking(e, &scored) != Ordering::Greater);
        self.entries.insert(at, scored);
    }

    pub fn extend(&mut self, scored: impl IntoIterator<Item = ScoredInterval>) {
        for s in scored {
            self.insert(s);
        }
    }

    pub fn pop_best(&mut self) -> Option<ScoredInterval> {
        self.entries.pop_front()
    }

    pub fn peek_best(&self) -> Option<&ScoredInterval> {
        self.entries.front()
    }

    /// Drop every pending candidate of `goal_id`. Returns how many were dropped.
    pub fn remove_all_for(&mut self, goal_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.candidate.goal_id != goal_id);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredInterval> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::Candidate;
    use crate::goal::Priority;
    use crate::interval::{Interval, SlotKind};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn scored(goal: &str, start: u32, score: f64, priority: Priority) -> ScoredInterval {
        ScoredInterval {
            candidate: Candidate {
                goal_id: goal.to_string(),
                interval: Interval::new(at(start), at(start + 1)).unwrap(),
                source_kind: SlotKind::Free,
                window_rank: None,
            },
            priority,
            score,
            explanation: vec![],
        }
    }

    fn drain(pool: &mut RankedCandidatePool) -> Vec<(String, u32)> {
        std::iter::from_fn(|| pool.pop_best())
            .map(|s| {
                use chrono::Timelike;
                (s.candidate.goal_id, s.candidate.interval.start().hour())
            })
            .collect()
    }

    #[test]
    fn pops_highest_score_first() {
        let mut pool = RankedCandidatePool::new();
        pool.insert(scored("a", 9, 1.0, Priority::Low));
        pool.insert(scored("b", 9, 5.0, Priority::Low));
        pool.insert(scored("c", 9, 3.0, Priority::Low));
        assert_eq!(pool.peek_best().unwrap().candidate.goal_id, "b");
        let order: Vec<_> = drain(&mut pool).into_iter().map(|(g, _)| g).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert!(pool.pop_best().is_none());
    }

    #[test]
    fn ties_break_on_priority_then_start_then_id() {
        let mut pool = RankedCandidatePool::new();
        pool.insert(scored("z", 10, 2.0, Priority::Medium));
        pool.insert(scored("y", 11, 2.0, Priority::High));
        pool.insert(scored("b", 9, 2.0, Priority::Medium));
        pool.insert(scored("a", 10, 2.0, Priority::Medium));
        assert_eq!(
            drain(&mut pool),
            vec![
                ("y".to_string(), 11),
                ("b".to_string(), 9),
                ("a".to_string(), 10),
                ("z".to_string(), 10)
            ]
        );
    }

    #[test]
    fn equal_entries_come_out_in_insertion_order() {
        let mut pool = RankedCandidatePool::new();
        let first = scored("a", 9, 2.0, Priority::Low);
        let mut second = first.clone();
        second.candidate.window_rank = Some(7);
        pool.insert(first);
        pool.insert(second);
        assert_eq!(pool.pop_best().unwrap().candidate.window_rank, None);
        assert_eq!(pool.pop_best().unwrap().candidate.window_rank, Some(7));
    }

    #[test]
    fn remove_all_for_only_touches_one_goal() {
        let mut pool = RankedCandidatePool::new();
        pool.extend([
            scored("a", 9, 1.0, Priority::Low),
            scored("b", 10, 2.0, Priority::Low),
            scored("a", 11, 3.0, Priority::Low),
        ]);
        assert_eq!(pool.remove_all_for("a"), 2);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.remove_all_for("missing"), 0);
        assert_eq!(pool.iter().next().unwrap().candidate.goal_id, "b");
    }
}
