//! Storage boundary for users and expenses.
//!
//! Handlers talk to an [`ExpenseStore`] trait object, never to a connection.
//! Production wires a [`MySqlExpenseStore`]; tests wire an [`InMemoryExpenseStore`].

pub mod in_memory;
pub mod mysql;
pub mod r#trait;

pub use in_memory::InMemoryExpenseStore;
pub use mysql::MySqlExpenseStore;
pub use r#trait::{ExpenseStore, StoreError};
