use axum::{routing::post, Router};

pub mod system;
pub mod users;

/// Router for the user-facing endpoints (`/api/users/...`).
pub fn router() -> Router {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/expense", post(users::add_expense))
}
