use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use expense_tracker_core::{Expense, ExpenseId, NewExpense, NewUser, User, UserId};

use super::r#trait::{ExpenseStore, StoreError};
use crate::schema;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    by_email: HashMap<String, usize>,
    expenses: Vec<Expense>,
}

/// In-memory users/expenses store.
///
/// Intended for tests/dev. Mirrors the constraints the MySQL schema enforces
/// (unique email, column widths, foreign key) so handlers see the same
/// failures they would in production.
#[derive(Debug, Default)]
pub struct InMemoryExpenseStore {
    tables: RwLock<Tables>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.tables.read().map(|t| t.users.len()).unwrap_or(0)
    }

    pub fn expense_count(&self) -> usize {
        self.tables.read().map(|t| t.expenses.len()).unwrap_or(0)
    }
}

fn check_width(column: &str, value: &str, width: usize) -> Result<(), StoreError> {
    if value.chars().count() > width {
        return Err(StoreError::Database(format!(
            "data too long for column '{column}'"
        )));
    }
    Ok(())
}

fn poisoned() -> StoreError {
    StoreError::Database("lock poisoned".to_string())
}

// AUTO_INCREMENT starts at 1.
fn next_id(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX).saturating_add(1)
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .by_email
            .get(email)
            .and_then(|idx| tables.users.get(*idx))
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserId, StoreError> {
        check_width("email", &user.email, schema::EMAIL_WIDTH)?;
        check_width("username", &user.username, schema::USERNAME_WIDTH)?;
        check_width("password", &user.password_hash, schema::PASSWORD_WIDTH)?;

        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        if tables.by_email.contains_key(&user.email) {
            return Err(StoreError::Duplicate(format!(
                "duplicate entry '{}' for key 'email'",
                user.email
            )));
        }

        let id = UserId::new(next_id(tables.users.len()));
        let idx = tables.users.len();
        tables.by_email.insert(user.email.clone(), idx);
        tables.users.push(user.into_user(id));
        Ok(id)
    }

    async fn insert_expense(&self, expense: NewExpense) -> Result<ExpenseId, StoreError> {
        check_width("name", &expense.name, schema::EXPENSE_NAME_WIDTH)?;
        check_width("type", &expense.kind, schema::EXPENSE_TYPE_WIDTH)?;

        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        if !tables.users.iter().any(|u| u.id == expense.user_id) {
            return Err(StoreError::Database(format!(
                "foreign key constraint fails: no user {}",
                expense.user_id
            )));
        }

        let id = ExpenseId::new(next_id(tables.expenses.len()));
        tables.expenses.push(expense.into_expense(id));
        Ok(id)
    }

    async fn expenses_for_user(&self, user_id: UserId) -> Result<Vec<Expense>, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }
}
