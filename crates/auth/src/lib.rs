//! `expense-tracker-auth` — credential hashing and verification.
//!
//! This crate is intentionally decoupled from HTTP and storage. It issues no
//! sessions or tokens: a successful verification is the whole outcome.

pub mod password;

pub use password::{PasswordError, PasswordHasher, DEFAULT_HASH_COST};
