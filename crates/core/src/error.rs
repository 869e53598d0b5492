//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic input failures. Storage concerns belong
/// to the infra crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One of the required expense inputs (name, amount, date) was absent or empty.
    #[error("missing required inputs")]
    MissingInputs,

    /// The amount could not be read as a decimal or does not fit the column.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The date is not an ISO calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A value failed validation (e.g. a field the schema requires).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn invalid_date(msg: impl Into<String>) -> Self {
        Self::InvalidDate(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
