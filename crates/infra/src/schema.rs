//! Database name, table DDL and column widths.
//!
//! Every statement here is idempotent (`IF NOT EXISTS`) and safe to re-run on
//! each start.

/// The database is not configurable.
pub const DATABASE_NAME: &str = "expense_tracker";

pub const CREATE_DATABASE: &str = "CREATE DATABASE IF NOT EXISTS expense_tracker";

pub const USE_DATABASE: &str = "USE expense_tracker";

pub const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        email VARCHAR(100) NOT NULL UNIQUE,
        username VARCHAR(50) NOT NULL,
        password VARCHAR(255)
    )
"#;

pub const CREATE_EXPENSES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS expenses (
        id INT AUTO_INCREMENT PRIMARY KEY,
        user_id INT NOT NULL,
        name VARCHAR(100) NOT NULL,
        amount DECIMAL(10, 2) NOT NULL,
        date DATE NOT NULL,
        type VARCHAR(10) NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
"#;

// VARCHAR widths, in characters.
pub const EMAIL_WIDTH: usize = 100;
pub const USERNAME_WIDTH: usize = 50;
pub const PASSWORD_WIDTH: usize = 255;
pub const EXPENSE_NAME_WIDTH: usize = 100;
pub const EXPENSE_TYPE_WIDTH: usize = 10;
