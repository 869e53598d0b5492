//! `expense-tracker-core` — domain types for users and expenses.
//!
//! This crate contains **pure domain** primitives (no storage or HTTP concerns).

pub mod error;
pub mod expense;
pub mod id;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use expense::{Expense, ExpenseDraft, NewExpense};
pub use id::{ExpenseId, UserId};
pub use user::{NewUser, User};
