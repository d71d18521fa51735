use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::puzzle::types::Difficulty;

pub const DEFAULT_CONFIG_PATH: &str = "escape-vault.toml";

/// Where the catalog and the save file live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file, or a directory of `room_*.json` files
    pub catalog: PathBuf,
    /// User save document
    pub saves: PathBuf,
    /// Filter used when summarising the catalog
    pub difficulty: Difficulty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("puzzles"),
            saves: PathBuf::from("saves/users.json"),
            difficulty: Difficulty::All,
        }
    }
}

impl Config {
    /// Read a TOML config. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
