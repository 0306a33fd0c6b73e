use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub code: u16,
    /// Human-readable description, safe to show to end users
    pub message: String,
    /// HTTP reason phrase
    pub status: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            status: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

/// Returned by the login endpoint when the client asks for JSON
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Provider authorization URL to navigate to
    pub url: String,
}

/// Session issued after a successful callback
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed session token
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Expiry as unix seconds
    pub expiry_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub code: u16,
    pub status: String,
    pub ts: DateTime<Utc>,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_carries_reason_phrase() {
        let body = ErrorResponse::new(StatusCode::UNAUTHORIZED, "Invalid state parameter");

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "code": 401,
                "message": "Invalid state parameter",
                "status": "Unauthorized"
            })
        );
    }
}
