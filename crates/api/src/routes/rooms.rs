//! Private room endpoints. Registered and guarded; not built yet.

use crate::middleware::AuthenticatedUser;
use crate::models::ErrorResponse;
use crate::routes::not_implemented;
use axum::{extract::Path, http::StatusCode, Extension, Json};
use tracing::debug;

type NotImplemented = (StatusCode, Json<ErrorResponse>);

#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Rooms"
)]
pub async fn create_room(Extension(user): Extension<AuthenticatedUser>) -> NotImplemented {
    debug!(user_id = %user.0.sub, "Create room requested");
    not_implemented("Create room endpoint not yet implemented")
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Rooms"
)]
pub async fn list_rooms(Extension(user): Extension<AuthenticatedUser>) -> NotImplemented {
    debug!(user_id = %user.0.sub, "List rooms requested");
    not_implemented("List rooms endpoint not yet implemented")
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room ID (UUID)")),
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Rooms"
)]
pub async fn get_room(
    Extension(user): Extension<AuthenticatedUser>,
    Path(room_id): Path<String>,
) -> NotImplemented {
    debug!(user_id = %user.0.sub, %room_id, "Get room requested");
    not_implemented("Get room endpoint not yet implemented")
}

#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room ID (UUID)")),
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Rooms"
)]
pub async fn delete_room(
    Extension(user): Extension<AuthenticatedUser>,
    Path(room_id): Path<String>,
) -> NotImplemented {
    debug!(user_id = %user.0.sub, %room_id, "Delete room requested");
    not_implemented("Delete room endpoint not yet implemented")
}

#[utoipa::path(
    post,
    path = "/api/v1/rooms/{id}/join",
    params(("id" = String, Path, description = "Room ID (UUID)")),
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Rooms"
)]
pub async fn join_room(
    Extension(user): Extension<AuthenticatedUser>,
    Path(room_id): Path<String>,
) -> NotImplemented {
    debug!(user_id = %user.0.sub, %room_id, "Join room requested");
    not_implemented("Join room endpoint not yet implemented")
}

#[utoipa::path(
    post,
    path = "/api/v1/rooms/{id}/leave",
    params(("id" = String, Path, description = "Room ID (UUID)")),
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "Rooms"
)]
pub async fn leave_room(
    Extension(user): Extension<AuthenticatedUser>,
    Path(room_id): Path<String>,
) -> NotImplemented {
    debug!(user_id = %user.0.sub, %room_id, "Leave room requested");
    not_implemented("Leave room endpoint not yet implemented")
}
