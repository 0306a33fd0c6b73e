use crate::models::{ErrorResponse, LoginResponse, TokenResponse};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use services::auth::{AuthError, AuthServiceTrait, CallbackRequest};
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::IntoParams;

pub const STATE_COOKIE: &str = "oauth_state";
const STATE_COOKIE_MAX_AGE_SECS: i64 = 900;

pub type AuthRouteState = Arc<dyn AuthServiceTrait>;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    /// Authorization code issued by the provider
    code: Option<String>,
    /// State value echoed back by the provider
    state: Option<String>,
}

fn state_cookie(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, value))
        .http_only(true)
        .secure(true)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

fn expired_state_cookie() -> Cookie<'static> {
    state_cookie(String::new(), time::Duration::ZERO)
}

/// True when any `Accept` entry is exactly `application/json` with a non-zero quality
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(accepts_json)
}

fn accepts_json(media_range: &str) -> bool {
    let mut parts = media_range.split(';').map(str::trim);
    let is_json = parts
        .next()
        .is_some_and(|essence| essence.eq_ignore_ascii_case("application/json"));

    let quality = parts
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
        .map(|(_, value)| value.trim().parse::<f32>().unwrap_or(0.0))
        .unwrap_or(1.0);

    is_json && quality > 0.0
}

/// Translate an authentication failure into its HTTP status and client-safe body.
pub fn auth_error_response(err: &AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match err {
        AuthError::UnsupportedProvider(_) => {
            (StatusCode::BAD_REQUEST, "Login provider not supported.")
        }
        AuthError::MissingCode => (StatusCode::BAD_REQUEST, "Missing authorization code"),
        AuthError::InvalidState => (StatusCode::UNAUTHORIZED, "Invalid state parameter"),
        AuthError::Unauthorized(_) => {
            (StatusCode::UNAUTHORIZED, "Missing or invalid bearer token")
        }
        AuthError::StateGeneration(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error when starting authentication",
        ),
        AuthError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        AuthError::TokenExchangeFailed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to exchange authorization code",
        ),
        AuthError::UserInfoFetchFailed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch user information",
        ),
        AuthError::UserPersistenceFailed(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist user")
        }
        AuthError::TokenIssuanceFailed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to issue session token",
        ),
    };

    // Server-side failures are logged where they happen, with provider context
    if err.is_client_error() {
        warn!("Authentication rejected: {err}");
    }

    (status, Json(ErrorResponse::new(status, message)))
}

/// Start an OAuth login
///
/// Binds a fresh state value to the browser through the `oauth_state` cookie
/// and sends the user to the provider. Clients that send
/// `Accept: application/json` receive the URL in the body instead.
#[utoipa::path(
    get,
    path = "/api/v1/auth/login/{provider}",
    params(("provider" = String, Path, description = "Identity provider: google or github")),
    responses(
        (status = 200, description = "Authorization URL", body = LoginResponse),
        (status = 307, description = "Redirect to the provider"),
        (status = 400, description = "Unsupported provider", body = ErrorResponse),
        (status = 500, description = "State generation failed", body = ErrorResponse),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(auth_service): State<AuthRouteState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let login = auth_service
        .start_login(&provider)
        .await
        .map_err(|e| auth_error_response(&e))?;

    let jar = jar.add(state_cookie(
        login.state,
        time::Duration::seconds(STATE_COOKIE_MAX_AGE_SECS),
    ));

    if wants_json(&headers) {
        debug!(provider = %login.provider, "Returning authorization URL as JSON");
        return Ok((jar, Json(LoginResponse { url: login.url })).into_response());
    }

    debug!(provider = %login.provider, "Redirecting to provider");
    Ok((jar, Redirect::temporary(&login.url)).into_response())
}

/// Complete an OAuth login
///
/// Validates the state round trip, exchanges the code, resolves the local
/// user and issues a session token. The state cookie is cleared on every
/// outcome.
#[utoipa::path(
    get,
    path = "/api/v1/auth/callback/{provider}",
    params(
        ("provider" = String, Path, description = "Identity provider: google or github"),
        CallbackParams
    ),
    responses(
        (status = 200, description = "Session issued", body = TokenResponse),
        (status = 400, description = "Unsupported provider or missing code", body = ErrorResponse),
        (status = 401, description = "State mismatch", body = ErrorResponse),
        (status = 500, description = "Upstream or storage failure", body = ErrorResponse),
    ),
    tag = "Auth"
)]
pub async fn callback(
    State(auth_service): State<AuthRouteState>,
    Path(provider): Path<String>,
    params: Result<Query<CallbackParams>, QueryRejection>,
    jar: CookieJar,
) -> Response {
    // A malformed query carries no usable state, so it fails the state check
    let params = params.map(|Query(p)| p).unwrap_or_else(|rejection| {
        warn!(%provider, "Malformed callback query: {rejection}");
        CallbackParams {
            code: None,
            state: None,
        }
    });

    let request = CallbackRequest {
        provider,
        code: params.code,
        state: params.state,
        state_cookie: jar.get(STATE_COOKIE).map(|c| c.value().to_string()),
    };

    let result = auth_service.handle_callback(request).await;
    let jar = jar.add(expired_state_cookie());

    match result {
        Ok(session) => (
            jar,
            Json(TokenResponse {
                token: session.token,
                token_type: session.token_type.to_string(),
                expiry_at: session.expires_at.timestamp(),
            }),
        )
            .into_response(),
        Err(e) => (jar, auth_error_response(&e)).into_response(),
    }
}

/// Refresh a session token (not implemented)
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    responses((status = 501, description = "Not implemented", body = ErrorResponse)),
    tag = "Auth"
)]
pub async fn refresh() -> (StatusCode, Json<ErrorResponse>) {
    crate::routes::not_implemented("Refresh endpoint not yet implemented")
}
