use std::fmt;

use serde::Deserialize;

use crate::player::item::ItemName;
use crate::player::progress::Progress;

/// Id carried by a puzzle until the catalog is flattened.
pub const UNASSIGNED_ID: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    /// No filter
    All,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::All => "ALL",
        }
    }

    /// Lookup by name. Anything unrecognised reads as `Easy`.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "MEDIUM" => Difficulty::Medium,
            "HARD" => Difficulty::Hard,
            "ALL" => Difficulty::All,
            _ => Difficulty::Easy,
        }
    }

    /// Whether a puzzle of `other` difficulty passes this filter.
    pub fn admits(&self, other: Difficulty) -> bool {
        *self == Difficulty::All || *self == other
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorState {
    pub num_doors: u32,
    /// 1-based
    pub correct_door: u32,
    pub attempts: u32,
    pub max_attempts: u32,
}

impl DoorState {
    /// Only the number of doors is known; the first door is correct.
    pub fn new(num_doors: u32) -> Self {
        let num_doors = num_doors.max(1);
        Self {
            num_doors,
            correct_door: 1,
            attempts: 0,
            max_attempts: num_doors,
        }
    }

    /// Explicit state as read from a save or catalog.
    pub fn with_state(num_doors: u32, correct_door: u32, attempts: u32) -> Self {
        let num_doors = num_doors.max(1);
        Self {
            num_doors,
            correct_door: correct_door.clamp(1, num_doors),
            attempts,
            max_attempts: num_doors,
        }
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }
}

/// Variant-specific part of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleKind {
    Riddle {
        answer: Option<String>,
        category: Option<String>,
    },
    Math {
        answer: i64,
    },
    Door(DoorState),
    Trivia {
        answer: Option<String>,
        category: Option<String>,
    },
}

impl PuzzleKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PuzzleKind::Riddle { .. } => "riddle",
            PuzzleKind::Math { .. } => "math",
            PuzzleKind::Door(_) => "door",
            PuzzleKind::Trivia { .. } => "trivia",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    /// [`UNASSIGNED_ID`] until flattening hands out a real one.
    pub id: i64,
    pub question: String,
    pub difficulty: Difficulty,
    pub locked: bool,
    pub reward: Option<ItemName>,
    pub hidden_hint: Option<String>,
    pub hidden_hint_shown: bool,
    pub kind: PuzzleKind,
}

impl Puzzle {
    pub fn new(question: impl Into<String>, kind: PuzzleKind) -> Self {
        Self {
            id: UNASSIGNED_ID,
            question: question.into(),
            difficulty: Difficulty::default(),
            locked: false,
            reward: None,
            hidden_hint: None,
            hidden_hint_shown: false,
            kind,
        }
    }

    pub fn riddle(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self::new(
            question,
            PuzzleKind::Riddle {
                answer: Some(answer.into()),
                category: None,
            },
        )
    }

    pub fn math(question: impl Into<String>, answer: i64) -> Self {
        Self::new(question, PuzzleKind::Math { answer })
    }

    pub fn door(question: impl Into<String>, num_doors: u32) -> Self {
        Self::new(question, PuzzleKind::Door(DoorState::new(num_doors)))
    }

    pub fn trivia(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self::new(
            question,
            PuzzleKind::Trivia {
                answer: Some(answer.into()),
                category: None,
            },
        )
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_reward(mut self, reward: ItemName) -> Self {
        self.reward = Some(reward);
        self
    }

    pub fn with_hidden_hint(mut self, hint: impl Into<String>) -> Self {
        self.hidden_hint = Some(hint.into());
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.id >= 0
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Show the hidden hint, if the puzzle has one.
    pub fn reveal_hint(&mut self) -> Option<&str> {
        let hint = self.hidden_hint.as_deref()?;
        self.hidden_hint_shown = true;
        Some(hint)
    }

    /// Check a player's answer. Door guesses use up an attempt.
    pub fn check_answer(&mut self, guess: &str) -> bool {
        if self.locked {
            return false;
        }
        let guess = guess.trim();

        match &mut self.kind {
            PuzzleKind::Riddle { answer, .. } | PuzzleKind::Trivia { answer, .. } => answer
                .as_deref()
                .is_some_and(|a| a.trim().eq_ignore_ascii_case(guess)),
            PuzzleKind::Math { answer } => guess.parse::<i64>().is_ok_and(|g| g == *answer),
            PuzzleKind::Door(door) => {
                if door.attempts_remaining() == 0 {
                    return false;
                }
                let Ok(pick) = guess.parse::<u32>() else {
                    return false;
                };
                door.attempts += 1;
                pick == door.correct_door
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeRoom {
    pub name: String,
    pub description: String,
    pub level: i64,
    pub solved: bool,
    pub puzzles: Vec<Puzzle>,
}

impl EscapeRoom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            level: 1,
            solved: false,
            puzzles: Vec::new(),
        }
    }

    pub fn with_puzzle(mut self, puzzle: Puzzle) -> Self {
        self.puzzles.push(puzzle);
        self
    }

    /// Every puzzle is done according to `progress`.
    pub fn is_complete(&self, progress: &Progress) -> bool {
        self.puzzles
            .iter()
            .all(|p| progress.is_completed(p.id, &p.question))
    }

    /// Mark solved once complete; returns the new solved flag.
    pub fn update_solved(&mut self, progress: &Progress) -> bool {
        if !self.solved && self.is_complete(progress) {
            self.solved = true;
        }
        self.solved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_lookup_falls_back_to_easy() {
        assert_eq!(Difficulty::from_name("hard"), Difficulty::Hard);
        assert_eq!(Difficulty::from_name(" All "), Difficulty::All);
        assert_eq!(Difficulty::from_name("impossible"), Difficulty::Easy);
    }

    #[test]
    fn test_all_admits_everything() {
        assert!(Difficulty::All.admits(Difficulty::Hard));
        assert!(Difficulty::Medium.admits(Difficulty::Medium));
        assert!(!Difficulty::Medium.admits(Difficulty::Easy));
    }

    #[test]
    fn test_door_state_clamps() {
        let door = DoorState::with_state(3, 9, 1);
        assert_eq!(door.correct_door, 3);
        assert_eq!(door.attempts_remaining(), 2);

        let door = DoorState::new(0);
        assert_eq!(door.num_doors, 1);
        assert_eq!(door.correct_door, 1);
    }

    #[test]
    fn test_text_answers_ignore_case() {
        let mut riddle = Puzzle::riddle("What has keys but no locks?", "A Piano");
        assert!(riddle.check_answer("  a piano "));
        assert!(!riddle.check_answer("a keyboard"));

        let mut open = Puzzle::new(
            "Anything?",
            PuzzleKind::Trivia {
                answer: None,
                category: None,
            },
        );
        assert!(!open.check_answer(""));
    }

    #[test]
    fn test_math_answer() {
        let mut math = Puzzle::math("6 * 7?", 42);
        assert!(math.check_answer("42"));
        assert!(!math.check_answer("forty-two"));
    }

    #[test]
    fn test_door_attempts_run_out() {
        let mut door = Puzzle::door("Pick a door", 2);
        assert!(!door.check_answer("2"));
        assert!(!door.check_answer("nope"));
        assert!(door.check_answer("1"));
        assert!(!door.check_answer("1"));

        if let PuzzleKind::Door(state) = &door.kind {
            assert_eq!(state.attempts, 2);
            assert_eq!(state.attempts_remaining(), 0);
        } else {
            panic!("expected a door puzzle");
        }
    }

    #[test]
    fn test_locked_puzzle_rejects_answers() {
        let mut math = Puzzle::math("1 + 1?", 2);
        math.lock();
        assert!(!math.check_answer("2"));
        math.unlock();
        assert!(math.check_answer("2"));
    }

    #[test]
    fn test_reveal_hint() {
        let mut plain = Puzzle::math("2 + 2?", 4);
        assert!(plain.reveal_hint().is_none());
        assert!(!plain.hidden_hint_shown);

        let mut hinted = plain.with_hidden_hint("Count your fingers");
        assert_eq!(hinted.reveal_hint(), Some("Count your fingers"));
        assert!(hinted.hidden_hint_shown);
    }

    #[test]
    fn test_room_completion() {
        let mut room = EscapeRoom::new("Study")
            .with_puzzle(Puzzle::math("1 + 1?", 2).with_id(1))
            .with_puzzle(Puzzle::riddle("Legacy riddle", "echo"));

        let mut progress = Progress::new();
        progress.mark_completed_by_id(1);
        assert!(!room.update_solved(&progress));

        progress.mark_completed_by_question("Legacy riddle");
        assert!(room.update_solved(&progress));
    }
}
