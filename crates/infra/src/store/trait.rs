use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use expense_tracker_core::{Expense, ExpenseId, NewExpense, NewUser, User, UserId};

/// Storage operation error.
///
/// These are **infrastructure errors**; the HTTP layer decides which of them a
/// caller gets to see.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique key (`users.email`) already holds this value.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// No database connection was ever established.
    #[error("database unavailable")]
    Unavailable,

    /// Any other rejection from the database (constraint, type, I/O).
    #[error("database error: {0}")]
    Database(String),
}

/// Users and expenses, keyed the way the API looks them up.
///
/// ## Semantics
///
/// - `find_user_by_email` returns `Ok(None)` for an unknown email; absence is not an error.
/// - `insert_user` must reject a second row with the same email as [`StoreError::Duplicate`].
/// - `insert_expense` must reject a `user_id` with no matching user.
/// - Nothing is updated or deleted.
///
/// There is no transaction spanning calls: a lookup followed by an insert can
/// interleave with another request doing the same.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert_user(&self, user: NewUser) -> Result<UserId, StoreError>;

    async fn insert_expense(&self, expense: NewExpense) -> Result<ExpenseId, StoreError>;

    /// All expenses recorded for `user_id`, oldest first.
    async fn expenses_for_user(&self, user_id: UserId) -> Result<Vec<Expense>, StoreError>;
}

#[async_trait]
impl<S> ExpenseStore for Arc<S>
where
    S: ExpenseStore + ?Sized,
{
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_user_by_email(email).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserId, StoreError> {
        (**self).insert_user(user).await
    }

    async fn insert_expense(&self, expense: NewExpense) -> Result<ExpenseId, StoreError> {
        (**self).insert_expense(expense).await
    }

    async fn expenses_for_user(&self, user_id: UserId) -> Result<Vec<Expense>, StoreError> {
        (**self).expenses_for_user(user_id).await
    }
}
