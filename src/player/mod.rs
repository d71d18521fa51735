pub mod inventory;
pub mod item;
pub mod progress;
pub mod user;

pub use inventory::Inventory;
pub use item::{Item, ItemName};
pub use progress::Progress;
pub use user::User;
