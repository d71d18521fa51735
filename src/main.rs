use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use escape_vault::config::{Config, DEFAULT_CONFIG_PATH};
use escape_vault::persistence::UserStore;
use escape_vault::puzzle::{flatten, load_rooms};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load(&config_path)?;

    let mut rooms = load_rooms(&config.catalog)
        .with_context(|| format!("loading catalog {}", config.catalog.display()))?;

    if rooms.is_empty() {
        eprintln!("No rooms found in {:?}", config.catalog);
        return Ok(());
    }

    let catalog = flatten(&mut rooms);
    let playable = catalog.filter_by_difficulty(config.difficulty).len();
    info!(
        "{} rooms, {} puzzles, {} playable at {}",
        rooms.len(),
        catalog.len(),
        playable,
        config.difficulty
    );

    let store = UserStore::open(&config.saves)
        .with_context(|| format!("loading saves {}", config.saves.display()))?;

    for room in &rooms {
        println!(
            "Level {:>2}  {:<24} {} puzzles{}",
            room.level,
            room.name,
            room.puzzles.len(),
            if room.solved { "  (solved)" } else { "" }
        );
    }

    for user in store.users() {
        let progress = &user.progress;
        let done = catalog
            .iter()
            .filter(|p| progress.is_completed(p.id, &p.question))
            .count();
        println!(
            "{:<16} score {:>5}  {:>3}/{} puzzles  {}s played  {} hints  {} items",
            user.username,
            progress.score(),
            done,
            catalog.len(),
            progress.time_spent(),
            progress.total_hints_used(),
            progress.inventory().total_units()
        );
    }

    Ok(())
}
