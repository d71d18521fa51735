use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

use super::codec::{deserialize_users, serialize_users};
use crate::error::LoadError;
use crate::json;
use crate::player::user::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username '{0}' is already taken")]
    DuplicateUser(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not replace {}: {}", .path.display(), .source)]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All saved users, backed by one JSON document on disk.
///
/// Saves rewrite the whole document. The new text goes to a temporary file
/// next to the target which is then renamed over it, so an interrupted save
/// leaves the previous file intact.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: Vec<User>,
}

impl UserStore {
    /// Empty store that will save to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            users: Vec::new(),
        }
    }

    /// Load the save at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let mut store = Self::new(path);
        match store.load() {
            Ok(()) => Ok(store),
            Err(LoadError::NotFound(path)) => {
                info!("No save file at {}, starting fresh", path.display());
                Ok(store)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the in-memory users with the file's contents.
    pub fn load(&mut self) -> Result<(), LoadError> {
        self.users = load_users(&self.path)?;
        Ok(())
    }

    pub fn save(&self) -> Result<(), StoreError> {
        save_users(&self.path, &self.users)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn find_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.username == username)
    }

    /// Add a new account. Usernames are unique; users without an id get one.
    pub fn add(&mut self, mut user: User) -> Result<&mut User, StoreError> {
        if self.find(&user.username).is_some() {
            return Err(StoreError::DuplicateUser(user.username));
        }
        if user.id.is_none() {
            user.id = Some(Uuid::new_v4());
        }
        self.users.push(user);
        let last = self.users.len() - 1;
        Ok(&mut self.users[last])
    }

    pub fn remove(&mut self, username: &str) -> Option<User> {
        let index = self.users.iter().position(|u| u.username == username)?;
        Some(self.users.remove(index))
    }

    /// Plain-text password check against the stored account.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        self.find(username).filter(|u| u.check_password(password))
    }
}

pub fn load_users(path: &Path) -> Result<Vec<User>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let users = deserialize_users(&json::parse(&content)?)?;
    info!("Loaded {} users from {}", users.len(), path.display());
    Ok(users)
}

pub fn save_users(path: &Path, users: &[User]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let text = json::serialize(&serialize_users(users));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    info!("Saved {} users to {}", users.len(), path.display());
    Ok(())
}
