//! Mutable per-player game progress.

use std::collections::{BTreeMap, BTreeSet};

use crate::puzzle::types::Difficulty;

use super::inventory::Inventory;

#[derive(Debug, Clone)]
pub struct Progress {
    current_level: u32,
    time_spent: u64,
    score: u64,
    completed_ids: BTreeSet<i64>,
    /// Older saves recorded completions by question text.
    completed_questions: Vec<String>,
    hints_used: BTreeMap<i64, u32>,
    last_difficulty: Difficulty,
    inventory: Inventory,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            current_level: 1,
            time_spent: 0,
            score: 0,
            completed_ids: BTreeSet::new(),
            completed_questions: Vec::new(),
            hints_used: BTreeMap::new(),
            last_difficulty: Difficulty::All,
            inventory: Inventory::new(),
        }
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn advance_level(&mut self) {
        self.current_level = self.current_level.saturating_add(1);
    }

    pub fn time_spent(&self) -> u64 {
        self.time_spent
    }

    /// Add play time. Non-positive amounts are ignored.
    pub fn add_time(&mut self, seconds: i64) {
        if seconds > 0 {
            self.time_spent = self.time_spent.saturating_add(seconds as u64);
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Adjust the score; a negative amount lowers it, never below zero.
    pub fn increase_score(&mut self, points: i64) {
        if points >= 0 {
            self.score = self.score.saturating_add(points as u64);
        } else {
            self.decrease_score(points.unsigned_abs());
        }
    }

    pub fn decrease_score(&mut self, points: u64) {
        self.score = self.score.saturating_sub(points);
    }

    pub fn mark_completed_by_id(&mut self, id: i64) {
        self.completed_ids.insert(id);
    }

    pub fn mark_completed_by_question(&mut self, question: impl Into<String>) {
        let question = question.into();
        if !self.completed_questions.contains(&question) {
            self.completed_questions.push(question);
        }
    }

    pub fn has_completed_puzzle_id(&self, id: i64) -> bool {
        self.completed_ids.contains(&id)
    }

    pub fn has_completed_question(&self, question: &str) -> bool {
        self.completed_questions.iter().any(|q| q == question)
    }

    /// Completed under either the id set or the legacy question list.
    pub fn is_completed(&self, id: i64, question: &str) -> bool {
        self.has_completed_puzzle_id(id) || self.has_completed_question(question)
    }

    pub fn completed_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.completed_ids.iter().copied()
    }

    pub fn completed_questions(&self) -> &[String] {
        &self.completed_questions
    }

    pub fn increment_hint_usage(&mut self, puzzle_id: i64) {
        let count = self.hints_used.entry(puzzle_id).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn hints_used_for(&self, puzzle_id: i64) -> u32 {
        self.hints_used.get(&puzzle_id).copied().unwrap_or(0)
    }

    pub fn hints_used(&self) -> impl Iterator<Item = (i64, u32)> + '_ {
        self.hints_used.iter().map(|(id, count)| (*id, *count))
    }

    pub fn total_hints_used(&self) -> u64 {
        self.hints_used.values().map(|c| *c as u64).sum()
    }

    pub fn last_difficulty(&self) -> Difficulty {
        self.last_difficulty
    }

    pub fn set_last_difficulty(&mut self, difficulty: Difficulty) {
        self.last_difficulty = difficulty;
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let progress = Progress::new();
        assert_eq!(progress.current_level(), 1);
        assert_eq!(progress.score(), 0);
        assert_eq!(progress.last_difficulty(), Difficulty::All);
        assert!(progress.inventory().is_empty());
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut progress = Progress::new();
        progress.increase_score(10);
        progress.increase_score(-25);
        assert_eq!(progress.score(), 0);

        progress.increase_score(7);
        progress.decrease_score(3);
        assert_eq!(progress.score(), 4);
    }

    #[test]
    fn test_time_only_moves_forward() {
        let mut progress = Progress::new();
        progress.add_time(30);
        progress.add_time(-10);
        progress.add_time(0);
        assert_eq!(progress.time_spent(), 30);
    }

    #[test]
    fn test_completion_predicate() {
        let mut progress = Progress::new();
        progress.mark_completed_by_id(4);
        progress.mark_completed_by_question("Old riddle");
        progress.mark_completed_by_question("Old riddle");

        assert!(progress.is_completed(4, "anything"));
        assert!(progress.is_completed(99, "Old riddle"));
        assert!(!progress.is_completed(99, "New riddle"));
        assert_eq!(progress.completed_questions().len(), 1);
    }

    #[test]
    fn test_hint_usage() {
        let mut progress = Progress::new();
        progress.increment_hint_usage(2);
        progress.increment_hint_usage(2);
        progress.increment_hint_usage(5);

        assert_eq!(progress.hints_used_for(2), 2);
        assert_eq!(progress.hints_used_for(3), 0);
        assert_eq!(progress.total_hints_used(), 3);
    }
}
