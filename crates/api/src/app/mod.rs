//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the register/login/expense flows over an injected store
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and response bodies
//! - `errors.rs`: mapping flow failures to status codes

use std::sync::Arc;

use axum::{http::Method, routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    // Any origin may call the API, as the browser client expects.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/users", routes::router())
        .layer(Extension(Arc::new(services)))
        .layer(ServiceBuilder::new().layer(cors))
}
