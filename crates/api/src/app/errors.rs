use axum::http::StatusCode;
use axum::response::IntoResponse;

use expense_tracker_core::DomainError;
use expense_tracker_infra::StoreError;

use crate::app::services::ServiceError;

pub const ALREADY_REGISTERED: &str = "User already registered";
pub const USER_NOT_FOUND: &str = "User not found";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password!";
pub const UNAUTHORIZED: &str = "Unauthorized";
pub const MISSING_INPUTS: &str = "Missing inputs required";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Status and body for a failed flow.
///
/// Storage details are logged here and never reach the caller.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::AlreadyRegistered => json_error(StatusCode::CONFLICT, ALREADY_REGISTERED),
        ServiceError::UserNotFound => json_error(StatusCode::NOT_FOUND, USER_NOT_FOUND),
        ServiceError::InvalidCredentials => json_error(StatusCode::BAD_REQUEST, INVALID_CREDENTIALS),
        ServiceError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, UNAUTHORIZED),
        ServiceError::Domain(DomainError::MissingInputs) => {
            json_error(StatusCode::BAD_REQUEST, MISSING_INPUTS)
        }
        ServiceError::Domain(e) => {
            tracing::info!(error = %e, "expense rejected");
            json_error(StatusCode::BAD_REQUEST, SOMETHING_WENT_WRONG)
        }
        ServiceError::Rejected(reason) => {
            tracing::info!(%reason, "insert rejected");
            json_error(StatusCode::BAD_REQUEST, SOMETHING_WENT_WRONG)
        }
        ServiceError::Store(StoreError::Unavailable) => {
            tracing::error!("database unavailable");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
        }
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store error");
            json_error(StatusCode::BAD_REQUEST, SOMETHING_WENT_WRONG)
        }
        ServiceError::Password(e) => {
            tracing::error!(error = %e, "password hashing error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
        }
        ServiceError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
        }
    }
}

/// A bare JSON string body with the given status.
pub fn json_error(status: StatusCode, message: &'static str) -> axum::response::Response {
    (status, axum::Json(message)).into_response()
}
