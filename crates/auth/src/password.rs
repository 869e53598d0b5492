//! Salted password hashing (bcrypt).

use thiserror::Error;

/// Work factor used for stored hashes.
pub const DEFAULT_HASH_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing failed (e.g. cost out of range, or no password supplied).
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The stored value is not a bcrypt hash.
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hashes and verifies passwords with a fixed bcrypt cost.
///
/// Every call to [`PasswordHasher::hash`] draws a fresh random salt, so hashing
/// the same password twice yields different strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Returns `Ok(false)` on a mismatch; `Err` only when `stored_hash` cannot be parsed.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(plaintext, stored_hash).map_err(|e| {
            tracing::warn!(error = %e, "stored password hash could not be verified");
            PasswordError::MalformedHash(e.to_string())
        })
    }
}
