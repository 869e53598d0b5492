//! Registered users.

use crate::UserId;

/// A row of the `users` table.
///
/// `email` is the natural key; lookups never go through `id` from the outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    /// Salted bcrypt hash. Never the plaintext.
    pub password_hash: String,
}

/// A user about to be inserted (id not yet assigned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}
