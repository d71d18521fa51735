use escape_vault::json;
use escape_vault::persistence::{deserialize_users, serialize_users, UserStore};
use escape_vault::player::{ItemName, User};
use escape_vault::puzzle::Difficulty;
use tempfile::TempDir;

#[test]
fn progress_survives_a_save_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.json");

    let mut store = UserStore::new(&path);
    let user = store.add(User::new("ada", "hunter2")).unwrap();
    let progress = &mut user.progress;
    progress.increase_score(10);
    progress.add_time(125);
    progress.mark_completed_by_id(1);
    progress.mark_completed_by_id(3);
    progress.mark_completed_by_question("What has keys but can't open locks?");
    progress.increment_hint_usage(1);
    progress.increment_hint_usage(1);
    progress.set_last_difficulty(Difficulty::Hard);
    progress.inventory().add_named(ItemName::Key, 2);
    store.save().unwrap();

    let store = UserStore::open(&path).unwrap();
    let ada = store.authenticate("ada", "hunter2").unwrap();
    let progress = &ada.progress;
    assert_eq!(progress.score(), 10);
    assert_eq!(progress.time_spent(), 125);
    assert!(progress.has_completed_puzzle_id(1));
    assert!(progress.has_completed_puzzle_id(3));
    assert!(!progress.has_completed_puzzle_id(2));
    assert!(progress.is_completed(77, "What has keys but can't open locks?"));
    assert_eq!(progress.hints_used_for(1), 2);
    assert_eq!(progress.last_difficulty(), Difficulty::Hard);
    assert_eq!(progress.inventory().quantity(ItemName::Key), 2);
}

#[test]
fn one_bad_record_does_not_sink_the_batch() {
    let text = r#"[
        {"username":"good","password":"1","progress":{"score":5,"timeSpent":60}},
        {"username":"odd","password":"2","progress":{
            "score":7,"timeSpent":30,"hintsUsed":{"one":1,"2":[3]},"inventory":[]
        }},
        "garbage"
    ]"#;
    let users = deserialize_users(&json::parse(text).unwrap()).unwrap();
    assert_eq!(users.len(), 2);

    let odd = &users[1].progress;
    assert_eq!(odd.score(), 7);
    assert_eq!(odd.time_spent(), 30);
    assert_eq!(odd.total_hints_used(), 0);
    assert!(odd.inventory().is_empty());
}

#[test]
fn written_document_reads_back_unchanged() {
    let mut user = User::new("bo", "pw");
    user.progress.increase_score(3);
    user.progress.inventory().add_named(ItemName::Lantern, 1);

    let first = json::serialize(&serialize_users(&[user]));
    let users = deserialize_users(&json::parse(&first).unwrap()).unwrap();
    let second = json::serialize(&serialize_users(&users));
    assert_eq!(first, second);
}

#[test]
fn unreadable_save_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.json");
    std::fs::write(&path, r#"{"not":"an array"}"#).unwrap();
    assert!(UserStore::open(&path).is_err());
}
