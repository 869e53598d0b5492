//! Startup provisioning: connect, then make sure the database and tables exist.
//!
//! Provisioning is an ordered list of idempotent DDL steps ([`PLAN`]). It is
//! best-effort and not transactional: a failing step is recorded as a
//! [`BootstrapError`] and, depending on its [`OnFailure`] policy, either stops
//! the remaining steps or lets them run. Nothing is retried.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use thiserror::Error;

use crate::schema;

/// One provisioning step, in execution order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BootstrapStep {
    Connect,
    CreateDatabase,
    UseDatabase,
    CreateUsersTable,
    CreateExpensesTable,
}

impl BootstrapStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BootstrapStep::Connect => "connect",
            BootstrapStep::CreateDatabase => "create_database",
            BootstrapStep::UseDatabase => "use_database",
            BootstrapStep::CreateUsersTable => "create_users_table",
            BootstrapStep::CreateExpensesTable => "create_expenses_table",
        }
    }
}

impl core::fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a failed step means for the steps after it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OnFailure {
    /// Later steps depend on this one; stop here.
    Abort,
    /// Later steps are attempted anyway.
    Continue,
}

/// Provisioning steps after the connection is up.
///
/// The two tables are attempted independently. `expenses` references `users`,
/// so in practice it fails too when `users` could not be created.
pub const PLAN: [(BootstrapStep, &str, OnFailure); 4] = [
    (BootstrapStep::CreateDatabase, schema::CREATE_DATABASE, OnFailure::Abort),
    (BootstrapStep::UseDatabase, schema::USE_DATABASE, OnFailure::Abort),
    (BootstrapStep::CreateUsersTable, schema::CREATE_USERS_TABLE, OnFailure::Continue),
    (BootstrapStep::CreateExpensesTable, schema::CREATE_EXPENSES_TABLE, OnFailure::Continue),
];

#[derive(Debug, Error)]
#[error("bootstrap step '{step}' failed: {source}")]
pub struct BootstrapError {
    pub step: BootstrapStep,
    #[source]
    pub source: sqlx::Error,
}

/// Runs raw DDL. Implemented for [`MySqlConnection`]; tests substitute a recorder.
#[async_trait]
pub trait SchemaExecutor: Send {
    async fn execute_ddl(&mut self, sql: &str) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl SchemaExecutor for MySqlConnection {
    async fn execute_ddl(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        sqlx::Executor::execute(&mut *self, sqlx::raw_sql(sql))
            .await
            .map(|_| ())
    }
}

/// Outcome of a bootstrap whose connection succeeded.
#[derive(Debug)]
pub struct Provisioned {
    pub connection: MySqlConnection,
    /// Steps that failed, in order. Empty when the schema is fully in place.
    pub failures: Vec<BootstrapError>,
}

impl Provisioned {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Open the single server connection (no database selected yet).
pub async fn connect(options: &MySqlConnectOptions) -> Result<MySqlConnection, BootstrapError> {
    let conn = MySqlConnection::connect_with(options)
        .await
        .map_err(|source| BootstrapError {
            step: BootstrapStep::Connect,
            source,
        })?;
    tracing::info!("connected to MySQL");
    Ok(conn)
}

/// Run [`PLAN`] against `executor`, returning every step failure.
pub async fn provision<E>(executor: &mut E) -> Vec<BootstrapError>
where
    E: SchemaExecutor + ?Sized,
{
    let mut failures = Vec::new();

    for (step, sql, on_failure) in PLAN {
        match executor.execute_ddl(sql).await {
            Ok(()) => tracing::info!(step = %step, "bootstrap step done"),
            Err(source) => {
                tracing::error!(step = %step, error = %source, "bootstrap step failed");
                failures.push(BootstrapError { step, source });
                if on_failure == OnFailure::Abort {
                    tracing::warn!(step = %step, "skipping remaining bootstrap steps");
                    break;
                }
            }
        }
    }

    failures
}

/// Connect and provision. Only a connection failure is returned as `Err`.
pub async fn bootstrap(options: &MySqlConnectOptions) -> Result<Provisioned, BootstrapError> {
    let mut connection = connect(options).await?;
    let failures = provision(&mut connection).await;
    Ok(Provisioned {
        connection,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records statements and fails the ones listed in `fail`.
    #[derive(Default)]
    struct Recorder {
        ran: Vec<String>,
        fail: Vec<&'static str>,
    }

    #[async_trait]
    impl SchemaExecutor for Recorder {
        async fn execute_ddl(&mut self, sql: &str) -> Result<(), sqlx::Error> {
            self.ran.push(sql.to_string());
            if self.fail.iter().any(|f| sql.contains(f)) {
                return Err(sqlx::Error::Protocol(format!("refused: {}", sql.trim())));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn runs_every_step_in_order() {
        let mut rec = Recorder::default();
        let failures = provision(&mut rec).await;

        assert!(failures.is_empty());
        let expected: Vec<String> = PLAN.iter().map(|(_, sql, _)| sql.to_string()).collect();
        assert_eq!(rec.ran, expected);
    }

    #[tokio::test]
    async fn database_failure_aborts_the_rest() {
        let mut rec = Recorder {
            fail: vec!["CREATE DATABASE"],
            ..Default::default()
        };
        let failures = provision(&mut rec).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].step, BootstrapStep::CreateDatabase);
        assert_eq!(rec.ran.len(), 1);
    }

    #[tokio::test]
    async fn use_failure_skips_tables() {
        let mut rec = Recorder {
            fail: vec!["USE "],
            ..Default::default()
        };
        let failures = provision(&mut rec).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].step, BootstrapStep::UseDatabase);
        assert_eq!(rec.ran.len(), 2);
    }

    #[tokio::test]
    async fn table_failures_do_not_stop_each_other() {
        let mut rec = Recorder {
            fail: vec!["TABLE IF NOT EXISTS users"],
            ..Default::default()
        };
        let failures = provision(&mut rec).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].step, BootstrapStep::CreateUsersTable);
        assert_eq!(rec.ran.len(), PLAN.len());
    }

    #[test]
    fn every_statement_is_idempotent() {
        for (step, sql, _) in PLAN {
            if step == BootstrapStep::UseDatabase {
                assert!(sql.contains(schema::DATABASE_NAME));
            } else {
                assert!(sql.contains("IF NOT EXISTS"), "{step}");
            }
        }
    }

    #[test]
    fn error_names_the_step() {
        let err = BootstrapError {
            step: BootstrapStep::Connect,
            source: sqlx::Error::PoolTimedOut,
        };
        assert!(err.to_string().contains("'connect'"));
    }
}
