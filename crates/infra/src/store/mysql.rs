//! MySQL-backed store over a single connection.
//!
//! There is no pool: every statement takes the one [`MySqlConnection`] behind an
//! async mutex, so queries from concurrent requests run one after another.
//! The lock is held for a single statement, never across a lookup and the
//! insert that follows it.
//!
//! ## Error Mapping
//!
//! | SQLx Error | MySQL error | StoreError |
//! |------------|-------------|------------|
//! | Database (unique violation) | `1062` | `Duplicate` |
//! | Database (other) | any | `Database` |
//! | any other | n/a | `Database` |
//!
//! A store built with [`MySqlExpenseStore::disconnected`] answers every call
//! with `Unavailable`.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::Row;
use tokio::sync::Mutex;
use tracing::instrument;

use expense_tracker_core::{Expense, ExpenseId, NewExpense, NewUser, User, UserId};

use super::r#trait::{ExpenseStore, StoreError};

pub struct MySqlExpenseStore {
    conn: Mutex<Option<MySqlConnection>>,
}

impl MySqlExpenseStore {
    /// Wrap a connection that already has `expense_tracker` selected.
    pub fn new(conn: MySqlConnection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// A store for a process whose startup connection failed.
    pub fn disconnected() -> Self {
        Self {
            conn: Mutex::new(None),
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

impl core::fmt::Debug for MySqlExpenseStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MySqlExpenseStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ExpenseStore for MySqlExpenseStore {
    #[instrument(skip(self), err)]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Unavailable)?;

        let row = sqlx::query(
            r#"
            SELECT id, email, username, password
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        row.map(|r| user_from_row(&r))
            .transpose()
            .map_err(|e| map_sqlx_error("find_user_by_email", e))
    }

    #[instrument(skip(self, user), fields(email = %user.email), err)]
    async fn insert_user(&self, user: NewUser) -> Result<UserId, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Unavailable)?;

        let result = sqlx::query("INSERT INTO users (email, username, password) VALUES (?, ?, ?)")
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.password_hash)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("insert_user", e))?;

        Ok(UserId::new(row_id(result.last_insert_id())?))
    }

    #[instrument(skip(self, expense), fields(user_id = %expense.user_id), err)]
    async fn insert_expense(&self, expense: NewExpense) -> Result<ExpenseId, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Unavailable)?;

        let result = sqlx::query(
            "INSERT INTO expenses (user_id, name, amount, date, type) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(expense.user_id.get())
        .bind(&expense.name)
        .bind(expense.amount)
        .bind(expense.date)
        .bind(&expense.kind)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("insert_expense", e))?;

        Ok(ExpenseId::new(row_id(result.last_insert_id())?))
    }

    #[instrument(skip(self), err)]
    async fn expenses_for_user(&self, user_id: UserId) -> Result<Vec<Expense>, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Unavailable)?;

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, amount, date, type
            FROM expenses
            WHERE user_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("expenses_for_user", e))?;

        rows.iter()
            .map(expense_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("expenses_for_user", e))
    }
}

fn row_id(raw: u64) -> Result<i64, StoreError> {
    i64::try_from(raw).map_err(|_| StoreError::Database(format!("insert id {raw} out of range")))
}

fn user_from_row(row: &MySqlRow) -> Result<User, sqlx::Error> {
    let password: Option<String> = row.try_get("password")?;
    Ok(User {
        id: UserId::new(row.try_get::<i64, _>("id")?),
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        password_hash: password.unwrap_or_default(),
    })
}

fn expense_from_row(row: &MySqlRow) -> Result<Expense, sqlx::Error> {
    Ok(Expense {
        id: ExpenseId::new(row.try_get::<i64, _>("id")?),
        user_id: UserId::new(row.try_get::<i64, _>("user_id")?),
        name: row.try_get("name")?,
        amount: row.try_get::<Decimal, _>("amount")?,
        date: row.try_get::<NaiveDate, _>("date")?,
        kind: row.try_get("type")?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            if db_err.is_unique_violation() {
                StoreError::Duplicate(msg)
            } else {
                StoreError::Database(msg)
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection closed in {}", operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
