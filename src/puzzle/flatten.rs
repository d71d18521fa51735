//! Collapse a room hierarchy into one id-addressed puzzle table.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::types::{Difficulty, EscapeRoom, Puzzle};

/// Puzzles keyed by id, iterated in room order then puzzle order.
#[derive(Debug, Clone, Default)]
pub struct FlatCatalog {
    puzzles: Vec<Puzzle>,
    index: HashMap<i64, usize>,
}

impl FlatCatalog {
    pub fn get(&self, id: i64) -> Option<&Puzzle> {
        self.index.get(&id).map(|&i| &self.puzzles[i])
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Puzzle> {
        let i = *self.index.get(&id)?;
        self.puzzles.get_mut(i)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.puzzles.iter().map(|p| p.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter()
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Puzzles admitted by a difficulty filter, in catalog order.
    pub fn filter_by_difficulty(&self, filter: Difficulty) -> Vec<&Puzzle> {
        self.puzzles
            .iter()
            .filter(|p| filter.admits(p.difficulty))
            .collect()
    }

    fn insert(&mut self, puzzle: Puzzle) -> bool {
        if self.index.contains_key(&puzzle.id) {
            return false;
        }
        self.index.insert(puzzle.id, self.puzzles.len());
        self.puzzles.push(puzzle);
        true
    }
}

/// Give every unassigned puzzle an id and build the lookup table.
///
/// Explicit ids are reserved up front and never changed. Unassigned puzzles
/// get the next free positive id from a counter starting at 1, and their
/// `id` field in `rooms` is updated to match. When two puzzles claim the
/// same explicit id the first one keeps the slot.
pub fn flatten(rooms: &mut [EscapeRoom]) -> FlatCatalog {
    let reserved: HashSet<i64> = rooms
        .iter()
        .flat_map(|room| room.puzzles.iter())
        .filter(|p| p.is_assigned())
        .map(|p| p.id)
        .collect();

    let mut catalog = FlatCatalog::default();
    let mut next_id: i64 = 1;

    for room in rooms.iter_mut() {
        for puzzle in room.puzzles.iter_mut() {
            if !puzzle.is_assigned() {
                while reserved.contains(&next_id) || catalog.contains(next_id) {
                    next_id += 1;
                }
                puzzle.id = next_id;
                next_id += 1;
                debug!("Assigned id {} to '{}' in room '{}'", puzzle.id, puzzle.question, room.name);
            }

            if !catalog.insert(puzzle.clone()) {
                warn!(
                    "Duplicate puzzle id {} in room '{}', keeping the first one",
                    puzzle.id, room.name
                );
            }
        }
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str, ids: &[i64]) -> EscapeRoom {
        let mut room = EscapeRoom::new(name);
        for (i, id) in ids.iter().enumerate() {
            room.puzzles
                .push(Puzzle::math(format!("{} #{}", name, i), 0).with_id(*id));
        }
        room
    }

    #[test]
    fn test_ids_follow_room_then_puzzle_order() {
        let mut rooms = vec![room("A", &[-1, -1]), room("B", &[-1, -1])];
        let catalog = flatten(&mut rooms);

        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(rooms[1].puzzles[0].id, 3);
        assert_eq!(catalog.get(3).unwrap().question, "B #0");
    }

    #[test]
    fn test_explicit_ids_are_skipped() {
        let mut rooms = vec![room("A", &[-1, -1]), room("B", &[-1, -1]), room("C", &[2])];
        let catalog = flatten(&mut rooms);

        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![1, 3, 4, 5, 2]);
        assert_eq!(rooms[2].puzzles[0].id, 2);
        assert_eq!(catalog.get(2).unwrap().question, "C #0");
    }

    #[test]
    fn test_explicit_id_first_in_order() {
        let mut rooms = vec![room("C", &[2]), room("A", &[-1, -1, -1])];
        let catalog = flatten(&mut rooms);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_duplicate_explicit_ids_keep_first() {
        let mut rooms = vec![room("A", &[5]), room("B", &[5, -1])];
        let catalog = flatten(&mut rooms);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(5).unwrap().question, "A #0");
        assert_eq!(catalog.get(1).unwrap().question, "B #1");
    }

    #[test]
    fn test_filter_by_difficulty() {
        let mut rooms = vec![EscapeRoom::new("A")
            .with_puzzle(Puzzle::math("easy", 1))
            .with_puzzle(Puzzle::math("hard", 2).with_difficulty(Difficulty::Hard))];
        let catalog = flatten(&mut rooms);

        assert_eq!(catalog.filter_by_difficulty(Difficulty::All).len(), 2);
        let hard = catalog.filter_by_difficulty(Difficulty::Hard);
        assert_eq!(hard.len(), 1);
        assert_eq!(hard[0].question, "hard");
    }

    #[test]
    fn test_get_mut_changes_catalog_copy() {
        let mut rooms = vec![room("A", &[-1])];
        let mut catalog = flatten(&mut rooms);
        catalog.get_mut(1).unwrap().lock();

        assert!(catalog.get(1).unwrap().locked);
        assert!(!rooms[0].puzzles[0].locked);
    }
}
