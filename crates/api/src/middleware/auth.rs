use crate::models::ErrorResponse;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use services::auth::{AuthServiceTrait, SessionClaims};
use std::sync::Arc;
use tracing::debug;

const UNAUTHORIZED_MESSAGE: &str = "Missing or invalid bearer token";

/// Verified session claims passed to route handlers
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub SessionClaims);

#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<dyn AuthServiceTrait>,
}

impl AuthState {
    pub fn new(auth_service: Arc<dyn AuthServiceTrait>) -> Self {
        Self { auth_service }
    }
}

fn unauthorized() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(
            StatusCode::UNAUTHORIZED,
            UNAUTHORIZED_MESSAGE,
        )),
    )
}

/// Require a valid `Authorization: Bearer <session token>` header
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let Some(authorization) = request.headers().typed_get::<Authorization<Bearer>>() else {
        debug!("Missing or malformed Authorization header");
        return Err(unauthorized());
    };

    let claims = state
        .auth_service
        .verify_session_token(authorization.token())
        .map_err(|e| {
            debug!("Rejected session token: {e}");
            unauthorized()
        })?;

    debug!(user_id = %claims.sub, "Authenticated request");
    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}
