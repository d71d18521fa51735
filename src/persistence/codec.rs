//! Users and their progress to and from the save document.
//!
//! Reading is best-effort per field: a damaged field is logged and skipped,
//! the rest of the record and the rest of the batch still load. Progress is
//! rebuilt by replaying the same mutations live play uses.

use log::{debug, warn};
use uuid::Uuid;

use crate::error::{FieldError, LoadError};
use crate::fields::{self, optional, or_default, to_integer};
use crate::json::{JsonValue, Map};
use crate::player::item::{Item, ItemName};
use crate::player::progress::Progress;
use crate::player::user::User;
use crate::puzzle::types::Difficulty;

/// Upper bound on replayed increments per counter. A damaged save can carry
/// counts in the billions; replaying them one by one would stall the load.
pub const MAX_REPLAY: i64 = 100_000;

fn replay_count(field: &str, count: i64) -> i64 {
    if count > MAX_REPLAY {
        warn!("{} count {} exceeds {}, capping it", field, count, MAX_REPLAY);
        MAX_REPLAY
    } else {
        count.max(0)
    }
}

pub fn serialize_users(users: &[User]) -> JsonValue {
    JsonValue::Array(users.iter().map(user_to_json).collect())
}

pub fn user_to_json(user: &User) -> JsonValue {
    let mut obj = Map::new();
    if let Some(id) = user.id {
        obj.insert("id", id.to_string());
    }
    obj.insert("username", user.username.as_str());
    obj.insert("password", user.password.as_str());
    obj.insert("progress", progress_to_json(&user.progress));
    obj.into()
}

pub fn progress_to_json(progress: &Progress) -> JsonValue {
    let mut obj = Map::new();
    obj.insert("currentLevel", progress.current_level());
    obj.insert("timeSpent", progress.time_spent());
    obj.insert("score", progress.score());
    obj.insert(
        "completedPuzzleIds",
        progress.completed_ids().collect::<Vec<_>>(),
    );
    obj.insert(
        "completedPuzzles",
        progress
            .completed_questions()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>(),
    );
    obj.insert(
        "hintsUsed",
        progress
            .hints_used()
            .map(|(id, count)| (id.to_string(), count))
            .collect::<Map>(),
    );
    obj.insert("lastDifficulty", progress.last_difficulty().as_str());
    obj.insert(
        "inventory",
        progress
            .inventory()
            .snapshot()
            .into_iter()
            .map(|(name, qty)| (name.as_str(), qty))
            .collect::<Map>(),
    );
    obj.into()
}

/// Read every object in a top-level array as a user.
pub fn deserialize_users(value: &JsonValue) -> Result<Vec<User>, LoadError> {
    let items = value.as_array().ok_or_else(|| {
        LoadError::Schema(format!(
            "user save must be an array, found {}",
            value.type_name()
        ))
    })?;

    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item.as_object() {
            Some(obj) => Some(user_from_json(obj)),
            None => {
                warn!("Skipping user record {}: expected object, found {}", i, item.type_name());
                None
            }
        })
        .collect())
}

pub fn user_from_json(obj: &Map) -> User {
    let username = or_default(fields::text(obj, "username"), "");
    let password = or_default(fields::text(obj, "password"), "");
    let mut user = User::new(username, password);

    if let Some(raw) = optional(fields::text(obj, "id")) {
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => user.id = Some(id),
            Err(_) => warn!(
                "{}",
                FieldError::Invalid {
                    field: "id",
                    value: raw.to_string(),
                }
            ),
        }
    }

    if let Some(progress) = optional(fields::object(obj, "progress")) {
        user.progress = progress_from_json(progress);
    }
    user
}

pub fn progress_from_json(obj: &Map) -> Progress {
    let mut progress = Progress::new();

    if let Some(level) = optional(fields::int(obj, "currentLevel")) {
        for _ in 1..replay_count("currentLevel", level).max(1) {
            progress.advance_level();
        }
    }

    if let Some(seconds) = optional(fields::int(obj, "timeSpent")) {
        progress.add_time(seconds);
    }

    if let Some(score) = optional(fields::int(obj, "score")) {
        progress.increase_score(score);
    }

    if let Some(ids) = optional(fields::array(obj, "completedPuzzleIds")) {
        for item in ids {
            match to_integer(item) {
                Some(id) => progress.mark_completed_by_id(id),
                None => debug!("Skipping completed puzzle id {}", item),
            }
        }
    }

    if let Some(questions) = optional(fields::array(obj, "completedPuzzles")) {
        for question in questions.iter().filter_map(JsonValue::as_str) {
            progress.mark_completed_by_question(question);
        }
    }

    if let Some(hints) = optional(fields::object(obj, "hintsUsed")) {
        for (key, count) in hints.iter() {
            let (Ok(id), Some(count)) = (key.trim().parse::<i64>(), to_integer(count)) else {
                warn!("Skipping hint entry '{}': {}", key, count);
                continue;
            };
            for _ in 0..replay_count("hintsUsed", count) {
                progress.increment_hint_usage(id);
            }
        }
    }

    if let Some(name) = optional(fields::text(obj, "lastDifficulty")) {
        progress.set_last_difficulty(Difficulty::from_name(name));
    }

    if let Some(items) = optional(fields::object(obj, "inventory")) {
        for (key, qty) in items.iter() {
            let Some(qty) = to_integer(qty).filter(|q| *q > 0) else {
                debug!("Skipping inventory entry '{}' with quantity {}", key, qty);
                continue;
            };
            match ItemName::from_name(key) {
                Some(name) => {
                    let template = progress
                        .inventory()
                        .template(name)
                        .unwrap_or_else(|| Item::default_for(name));
                    progress
                        .inventory()
                        .add(template, qty.min(u32::MAX as i64) as u32);
                }
                None => debug!("Skipping unknown item '{}'", key),
            }
        }
    }

    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{parse, serialize};

    #[test]
    fn test_progress_round_trip() {
        let mut user = User::new("ada", "pw");
        user.progress.increase_score(10);
        user.progress.mark_completed_by_id(1);
        user.progress.mark_completed_by_id(3);
        user.progress.increment_hint_usage(1);
        user.progress.increment_hint_usage(1);
        user.progress.inventory().add_named(ItemName::Key, 2);

        let text = serialize(&serialize_users(&[user]));
        let users = deserialize_users(&parse(&text).unwrap()).unwrap();
        let progress = &users[0].progress;

        assert_eq!(progress.score(), 10);
        assert!(progress.has_completed_puzzle_id(1));
        assert!(progress.has_completed_puzzle_id(3));
        assert_eq!(progress.hints_used_for(1), 2);
        assert_eq!(progress.inventory().quantity(ItemName::Key), 2);
    }

    #[test]
    fn test_fresh_user_emits_full_progress() {
        let value = user_to_json(&User::new("", ""));
        let progress = value.get("progress").unwrap();

        for key in [
            "timeSpent",
            "score",
            "completedPuzzleIds",
            "completedPuzzles",
            "hintsUsed",
            "lastDifficulty",
            "inventory",
        ] {
            assert!(progress.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(progress.get("lastDifficulty").and_then(JsonValue::as_str), Some("ALL"));
        assert_eq!(value.get("password").and_then(JsonValue::as_str), Some(""));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_serialized_field_shapes() {
        let mut user = User::new("bo", "x");
        user.progress.increment_hint_usage(12);
        user.progress.mark_completed_by_question("Old one");
        user.progress.inventory().add_named(ItemName::Torch, 1);

        let text = serialize(&user_to_json(&user));
        assert!(text.contains(r#""hintsUsed":{"12":1}"#));
        assert!(text.contains(r#""completedPuzzles":["Old one"]"#));
        assert!(text.contains(r#""inventory":{"TORCH":1}"#));
    }

    #[test]
    fn test_malformed_hints_keep_other_fields() {
        let doc = parse(
            r#"[{"username":"cy","password":"p","progress":{
                "score": 25, "timeSpent": 90,
                "hintsUsed": {"abc": 2, "4": "many", "5": 1},
                "inventory": {"key": 1, "SWORD": 3, "TORCH": 0, "POTION": -2}
            }}]"#,
        )
        .unwrap();
        let users = deserialize_users(&doc).unwrap();
        let progress = &users[0].progress;

        assert_eq!(progress.score(), 25);
        assert_eq!(progress.time_spent(), 90);
        assert_eq!(progress.hints_used_for(4), 0);
        assert_eq!(progress.hints_used_for(5), 1);
        assert_eq!(progress.inventory().snapshot(), vec![(ItemName::Key, 1)]);
    }

    #[test]
    fn test_damaged_fields_are_skipped() {
        let doc = parse(
            r#"[{"username":"dee","id":"not-a-uuid","progress":{
                "score":"lots","timeSpent":null,
                "completedPuzzleIds":[1,"2","x",null,3.5],
                "completedPuzzles":["Q",7,null],
                "lastDifficulty":"nightmare"
            }}, 7, {"password":"only"}]"#,
        )
        .unwrap();
        let users = deserialize_users(&doc).unwrap();
        assert_eq!(users.len(), 2);

        let dee = &users[0];
        assert!(dee.id.is_none());
        assert_eq!(dee.password, "");
        assert_eq!(dee.progress.score(), 0);
        assert_eq!(dee.progress.completed_ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(dee.progress.completed_questions(), ["Q".to_string()]);
        assert_eq!(dee.progress.last_difficulty(), Difficulty::Easy);

        assert_eq!(users[1].username, "");
        assert_eq!(users[1].progress.last_difficulty(), Difficulty::All);
    }

    #[test]
    fn test_user_id_round_trip() {
        let id = Uuid::new_v4();
        let user = User::new("eve", "pw").with_id(id);
        let users = deserialize_users(&serialize_users(&[user])).unwrap();
        assert_eq!(users[0].id, Some(id));
    }

    #[test]
    fn test_top_level_must_be_array() {
        let doc = parse(r#"{"username":"x"}"#).unwrap();
        assert!(matches!(deserialize_users(&doc), Err(LoadError::Schema(_))));
    }

    #[test]
    fn test_huge_counters_are_capped() {
        let doc = parse(
            r#"[{"progress":{"score":4,"currentLevel":4000000000,"hintsUsed":{"1":4000000000,"2":3}}}]"#,
        )
        .unwrap();
        let users = deserialize_users(&doc).unwrap();
        let progress = &users[0].progress;

        assert_eq!(progress.hints_used_for(1), MAX_REPLAY as u32);
        assert_eq!(progress.hints_used_for(2), 3);
        assert_eq!(progress.current_level(), MAX_REPLAY as u32);
        assert_eq!(progress.score(), 4);
    }

    #[test]
    fn test_level_is_replayed() {
        let doc = parse(r#"[{"progress":{"currentLevel":3}}]"#).unwrap();
        let users = deserialize_users(&doc).unwrap();
        assert_eq!(users[0].progress.current_level(), 3);
    }
}
