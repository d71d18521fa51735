use std::path::Path;

use log::{debug, info, warn};

use super::types::{Difficulty, DoorState, EscapeRoom, Puzzle, PuzzleKind};
use crate::error::{FieldError, LoadError};
use crate::fields::{self, optional, or_default};
use crate::json::{self, JsonValue, Map};
use crate::player::item::ItemName;

/// Load a catalog from a JSON file, or from every `room_*.json` in a directory.
pub fn load_rooms(path: &Path) -> Result<Vec<EscapeRoom>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return load_floor(path);
    }

    let content = std::fs::read_to_string(path)?;
    let rooms = load_rooms_from_str(&content)?;
    info!("Loaded {} rooms from {}", rooms.len(), path.display());
    Ok(rooms)
}

/// Load every `room_*.json` file in a directory, in file name order.
pub fn load_floor(floor_dir: &Path) -> Result<Vec<EscapeRoom>, LoadError> {
    let dir = glob::Pattern::escape(&floor_dir.to_string_lossy());
    let pattern = format!("{}/room_*.json", dir.trim_end_matches('/'));

    let mut entries: Vec<_> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable catalog entry: {}", e);
                None
            }
        })
        .collect();

    // Sort by filename so room_01, room_02, room_03 are in order
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut rooms = Vec::new();
    for entry in &entries {
        let content = std::fs::read_to_string(entry)?;
        rooms.extend(load_rooms_from_str(&content)?);
    }

    info!(
        "Loaded {} rooms from {} files in {}",
        rooms.len(),
        entries.len(),
        floor_dir.display()
    );
    Ok(rooms)
}

pub fn load_rooms_from_str(text: &str) -> Result<Vec<EscapeRoom>, LoadError> {
    let value = json::parse(text)?;
    rooms_from_value(&value)
}

/// Map a parsed catalog: an array of rooms or a single room object.
pub fn rooms_from_value(value: &JsonValue) -> Result<Vec<EscapeRoom>, LoadError> {
    match value {
        JsonValue::Object(obj) => Ok(vec![parse_room(obj)]),
        JsonValue::Array(items) => Ok(items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item.as_object() {
                Some(obj) => Some(parse_room(obj)),
                None => {
                    warn!("Skipping catalog entry {}: expected object, found {}", i, item.type_name());
                    None
                }
            })
            .collect()),
        other => Err(LoadError::Schema(format!(
            "catalog must be an object or an array, found {}",
            other.type_name()
        ))),
    }
}

pub fn parse_room(obj: &Map) -> EscapeRoom {
    let name = fields::text(obj, "name")
        .or_else(|_| fields::text(obj, "roomName"))
        .map(str::to_string);

    let mut room = EscapeRoom::new(or_default(name, "Unnamed Room".to_string()));
    room.description = or_default(fields::text(obj, "description"), "").to_string();
    room.solved = or_default(fields::boolean(obj, "isSolved"), false);
    room.level = or_default(fields::int(obj, "level"), 1);

    let list = if obj.get("puzzle").is_some_and(|v| !v.is_null()) {
        obj.get("puzzle")
    } else {
        obj.get("puzzles")
    };

    match list {
        Some(JsonValue::Array(items)) => {
            for item in items {
                match item.as_object() {
                    Some(p) => room.puzzles.push(parse_puzzle(p)),
                    None => warn!(
                        "Skipping puzzle in room '{}': expected object, found {}",
                        room.name,
                        item.type_name()
                    ),
                }
            }
        }
        Some(JsonValue::Object(p)) => room.puzzles.push(parse_puzzle(p)),
        Some(JsonValue::Null) | None => debug!("Room '{}' has no puzzles", room.name),
        Some(other) => warn!(
            "Ignoring puzzle list of room '{}': found {}",
            room.name,
            other.type_name()
        ),
    }

    room
}

pub fn parse_puzzle(obj: &Map) -> Puzzle {
    let kind_name = or_default(fields::text(obj, "type"), "riddle").to_ascii_lowercase();
    let question = or_default(fields::text(obj, "question"), "").to_string();
    let difficulty = optional(fields::text(obj, "difficulty")).map(Difficulty::from_name);

    let kind = match kind_name.as_str() {
        "math" => PuzzleKind::Math {
            answer: or_default(fields::int(obj, "answer"), 0),
        },
        "door" => PuzzleKind::Door(parse_door(obj)),
        "trivia" => PuzzleKind::Trivia {
            answer: text_answer(obj),
            category: optional(fields::text(obj, "category")).map(str::to_string),
        },
        other => {
            if other != "riddle" {
                warn!("Unknown puzzle type '{}', treating it as a riddle", other);
            }
            PuzzleKind::Riddle {
                answer: text_answer(obj),
                category: optional(fields::text(obj, "category")).map(str::to_string),
            }
        }
    };

    let mut puzzle = Puzzle::new(question, kind);
    if let Some(difficulty) = difficulty {
        puzzle.difficulty = difficulty;
    }
    apply_common_fields(&mut puzzle, obj);
    puzzle
}

fn parse_door(obj: &Map) -> DoorState {
    let num_doors = clamp_u32(or_default(fields::int(obj, "numDoors"), 2)).max(1);
    let explicit = ["correctDoor", "attempts", "difficulty"]
        .iter()
        .any(|key| obj.contains_key(key));

    let mut door = if explicit {
        DoorState::with_state(
            num_doors,
            clamp_u32(or_default(fields::int(obj, "correctDoor"), 1)),
            clamp_u32(or_default(fields::int(obj, "attempts"), 0)),
        )
    } else {
        DoorState::new(num_doors)
    };

    if let Some(max) = optional(fields::int(obj, "maxAttempts")) {
        door.max_attempts = clamp_u32(max).max(1);
    }
    door
}

fn clamp_u32(n: i64) -> u32 {
    n.clamp(0, u32::MAX as i64) as u32
}

/// Text answers may be written as numbers in hand-edited catalogs.
fn text_answer(obj: &Map) -> Option<String> {
    match obj.get("answer") {
        Some(JsonValue::String(s)) => Some(s.clone()),
        Some(JsonValue::Number(_)) => obj.get("answer").map(json::serialize),
        _ => None,
    }
}

fn apply_common_fields(puzzle: &mut Puzzle, obj: &Map) {
    if let Some(id) = optional(fields::int(obj, "id")) {
        if id >= 0 {
            puzzle.id = id;
        }
    }

    if let Some(name) = optional(fields::text(obj, "reward")) {
        match ItemName::from_name(name) {
            Some(item) => puzzle.reward = Some(item),
            None => warn!(
                "{}",
                FieldError::Invalid {
                    field: "reward",
                    value: name.to_string(),
                }
            ),
        }
    }

    puzzle.locked = or_default(fields::boolean(obj, "locked"), false);

    if let Some(hint) = optional(fields::text(obj, "hiddenHint")) {
        if !hint.trim().is_empty() {
            puzzle.hidden_hint = Some(hint.to_string());
        }
    }
}

/// Write rooms back in catalog form.
pub fn rooms_to_json(rooms: &[EscapeRoom]) -> JsonValue {
    JsonValue::Array(rooms.iter().map(room_to_json).collect())
}

pub fn room_to_json(room: &EscapeRoom) -> JsonValue {
    let mut obj = Map::new();
    obj.insert("name", room.name.as_str());
    obj.insert("description", room.description.as_str());
    obj.insert("isSolved", room.solved);
    obj.insert("level", room.level);
    obj.insert(
        "puzzles",
        JsonValue::Array(room.puzzles.iter().map(puzzle_to_json).collect()),
    );
    obj.into()
}

pub fn puzzle_to_json(puzzle: &Puzzle) -> JsonValue {
    let mut obj = Map::new();
    obj.insert("type", puzzle.kind.type_name());
    if puzzle.is_assigned() {
        obj.insert("id", puzzle.id);
    }
    obj.insert("question", puzzle.question.as_str());
    obj.insert("difficulty", puzzle.difficulty.as_str());

    match &puzzle.kind {
        PuzzleKind::Math { answer } => obj.insert("answer", *answer),
        PuzzleKind::Door(door) => {
            obj.insert("numDoors", door.num_doors);
            obj.insert("correctDoor", door.correct_door);
            obj.insert("attempts", door.attempts);
            obj.insert("maxAttempts", door.max_attempts);
        }
        PuzzleKind::Riddle { answer, category } | PuzzleKind::Trivia { answer, category } => {
            obj.insert("answer", answer.as_deref());
            if let Some(category) = category {
                obj.insert("category", category.as_str());
            }
        }
    }

    if let Some(reward) = puzzle.reward {
        obj.insert("reward", reward.as_str());
    }
    obj.insert("locked", puzzle.locked);
    if let Some(hint) = &puzzle.hidden_hint {
        obj.insert("hiddenHint", hint.as_str());
    }
    obj.into()
}
