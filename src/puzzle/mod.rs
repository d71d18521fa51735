pub mod flatten;
pub mod loader;
pub mod types;

pub use flatten::{flatten, FlatCatalog};
pub use loader::{load_floor, load_rooms, load_rooms_from_str, rooms_to_json};
pub use types::{Difficulty, DoorState, EscapeRoom, Puzzle, PuzzleKind, UNASSIGNED_ID};
