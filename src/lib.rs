//! Escape Vault - saved state for a puzzle escape-room game.
//!
//! - `json`: a small JSON parser and compact writer
//! - `puzzle`: room catalog loading, puzzle variants and id flattening
//! - `player`: items, inventory, progress and accounts
//! - `persistence`: the user save document and its file-backed store

pub mod config;
pub mod error;
mod fields;
pub mod json;
pub mod persistence;
pub mod player;
pub mod puzzle;

pub use error::{FieldError, LoadError};
