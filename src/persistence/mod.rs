//! Saving and loading player accounts.

pub mod codec;
pub mod store;

pub use codec::{deserialize_users, serialize_users};
pub use store::{load_users, save_users, StoreError, UserStore};
