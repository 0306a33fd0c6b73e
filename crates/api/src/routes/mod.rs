pub mod auth;
pub mod health;
pub mod rooms;
pub mod secrets;

use crate::models::ErrorResponse;
use axum::{http::StatusCode, Json};

/// Placeholder response for registered but unbuilt endpoints
pub(crate) fn not_implemented(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(ErrorResponse::new(StatusCode::NOT_IMPLEMENTED, message)),
    )
}
