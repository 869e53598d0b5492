use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match parse_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.register(body).await {
        Ok(_) => (StatusCode::OK, Json(dto::REGISTERED)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match parse_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.login(body).await {
        Ok(_) => (StatusCode::OK, Json(dto::LOGGED_IN)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn add_expense(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AddExpenseRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match parse_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.add_expense(body).await {
        Ok(_) => (StatusCode::CREATED, Json(dto::EXPENSE_ADDED)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Unreadable bodies get the generic 400 rather than axum's default rejection.
fn parse_body<T: DeserializeOwned>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, axum::response::Response> {
    match body {
        Ok(Json(b)) => Ok(b),
        Err(rejection) => {
            tracing::info!(error = %rejection, "unreadable request body");
            Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                errors::SOMETHING_WENT_WRONG,
            ))
        }
    }
}
