use uuid::Uuid;

use super::progress::Progress;

/// A player account.
///
/// The password is kept and compared as plain text because the save file
/// stores it that way; hashing it would change the on-disk format.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password: String,
    pub id: Option<Uuid>,
    pub progress: Progress,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            id: None,
            progress: Progress::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn check_password(&self, password: &str) -> bool {
        self.password == password
    }
}
