//! Burn-on-read secret endpoints. Registered and guarded; not built yet.

use crate::middleware::AuthenticatedUser;
use crate::models::ErrorResponse;
use crate::routes::not_implemented;
use axum::{extract::Path, http::StatusCode, Extension, Json};
use tracing::debug;

#[utoipa::path(
    post,
    path = "/api/v1/rooms/{id}/secrets",
    params(("id" = String, Path, description = "Room ID (UUID)")),
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Secrets"
)]
pub async fn create_secret(
    Extension(user): Extension<AuthenticatedUser>,
    Path(room_id): Path<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    debug!(user_id = %user.0.sub, %room_id, "Create secret requested");
    not_implemented("Create secret endpoint not yet implemented")
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/secrets",
    params(("id" = String, Path, description = "Room ID (UUID)")),
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Secrets"
)]
pub async fn list_secrets(
    Extension(user): Extension<AuthenticatedUser>,
    Path(room_id): Path<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    debug!(user_id = %user.0.sub, %room_id, "List secrets requested");
    not_implemented("List secrets endpoint not yet implemented")
}

/// Read a secret. Once built, a read destroys it.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/secrets/{secret_id}",
    params(
        ("id" = String, Path, description = "Room ID (UUID)"),
        ("secret_id" = String, Path, description = "Secret ID (UUID)"),
    ),
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Secrets"
)]
pub async fn get_secret(
    Extension(user): Extension<AuthenticatedUser>,
    Path((room_id, secret_id)): Path<(String, String)>,
) -> (StatusCode, Json<ErrorResponse>) {
    debug!(user_id = %user.0.sub, %room_id, %secret_id, "Get secret requested");
    not_implemented("Get secret endpoint not yet implemented")
}
