//! Process configuration, read from the environment.
//!
//! Recognized variables: `DB_HOST`, `DB_USER`, `DB_PASSWORD`. The database name
//! and both ports are fixed. Empty values count as unset.

use sqlx::mysql::MySqlConnectOptions;

/// Address the HTTP server binds.
pub const LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Standard MySQL port.
pub const DB_PORT: u16 = 3306;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_USER: &str = "root";

/// Connection parameters for the MySQL server.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: Option<String>,
}

impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = get("DB_HOST").unwrap_or_else(|| {
            tracing::warn!("DB_HOST not set; using {DEFAULT_DB_HOST}");
            DEFAULT_DB_HOST.to_string()
        });
        let user = get("DB_USER").unwrap_or_else(|| {
            tracing::warn!("DB_USER not set; using {DEFAULT_DB_USER}");
            DEFAULT_DB_USER.to_string()
        });

        Self {
            host,
            user,
            password: get("DB_PASSWORD"),
        }
    }

    /// Server-level options; no database is selected until bootstrap switches to it.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let opts = MySqlConnectOptions::new()
            .host(&self.host)
            .port(DB_PORT)
            .username(&self.user);
        match &self.password {
            Some(p) => opts.password(p),
            None => opts,
        }
    }
}
