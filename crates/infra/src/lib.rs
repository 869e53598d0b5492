//! Infrastructure layer: MySQL connection, schema provisioning, storage adapters.

pub mod bootstrap;
pub mod schema;
pub mod store;

pub use bootstrap::{bootstrap, BootstrapError, BootstrapStep, Provisioned};
pub use store::{ExpenseStore, InMemoryExpenseStore, MySqlExpenseStore, StoreError};
