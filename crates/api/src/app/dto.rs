use serde::Deserialize;

use expense_tracker_core::ExpenseDraft;

// -------------------------
// Request DTOs
// -------------------------
//
// Every field is optional: presence is a business rule decided by the
// services, not a deserialization failure.

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddExpenseRequest {
    pub email: Option<String>,
    #[serde(flatten)]
    pub expense: ExpenseDraft,
}

// -------------------------
// Response bodies
// -------------------------
//
// Bodies are bare JSON strings.

pub const REGISTERED: &str = "User registration successful";
pub const LOGGED_IN: &str = "login successful";
pub const EXPENSE_ADDED: &str = "Expense added successfully";
