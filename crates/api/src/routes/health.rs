use crate::models::{ErrorResponse, HealthResponse};
use axum::{extract::State, http::StatusCode, response::Json as ResponseJson};
use chrono::Utc;
use services::health::HealthCheckTrait;
use std::sync::Arc;
use tracing::{debug, error};

pub const SERVICE_NAME: &str = "vanish-vault";

pub type HealthState = Arc<dyn HealthCheckTrait>;

/// Health check endpoint
///
/// Reports whether the service and its database are reachable.
/// This endpoint requires no authentication and is useful for monitoring and load balancers.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = ErrorResponse),
    ),
    tag = "Infra"
)]
pub async fn health_check(
    State(health): State<HealthState>,
) -> Result<ResponseJson<HealthResponse>, (StatusCode, ResponseJson<ErrorResponse>)> {
    debug!("Health check requested");

    if let Err(e) = health.check_database().await {
        error!("Health check failed: {e:#}");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            ResponseJson(ErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Database connection error",
            )),
        ));
    }

    Ok(ResponseJson(HealthResponse {
        code: StatusCode::OK.as_u16(),
        status: "OK".to_string(),
        ts: Utc::now(),
        service: SERVICE_NAME.to_string(),
    }))
}
