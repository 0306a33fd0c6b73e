use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[cfg(any(test, feature = "test-mocks"))]
use mockall::automock;

use super::providers::ProviderConfig;
use crate::common::RepositoryError;

// Domain ID types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        UserId(uuid)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported external identity providers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    GitHub,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Google, Provider::GitHub];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::GitHub => "github",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "github" => Ok(Provider::GitHub),
            other => Err(AuthError::UnsupportedProvider(other.to_string())),
        }
    }
}

// Domain models
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub provider: Provider,
    pub provider_user_id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Provider-agnostic identity resolved from a userinfo endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub provider: Provider,
    pub external_id: String,
    pub email: Option<String>,
}

/// Result of starting a login: where to send the user and the state to bind
/// to their browser
#[derive(Debug, Clone)]
pub struct LoginStart {
    pub provider: Provider,
    pub url: String,
    pub state: String,
}

/// Everything the callback endpoint received from the browser
#[derive(Debug, Clone, Default)]
pub struct CallbackRequest {
    pub provider: String,
    pub code: Option<String>,
    pub state: Option<String>,
    pub state_cookie: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// A completed login
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user_id: UserId,
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid state parameter")]
    InvalidState,

    #[error("Missing authorization code")]
    MissingCode,

    #[error("State generation failed: {0}")]
    StateGeneration(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("User info fetch failed: {0}")]
    UserInfoFetchFailed(String),

    #[error("User persistence failed: {0}")]
    UserPersistenceFailed(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuanceFailed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AuthError {
    /// Errors caused by the caller rather than by this service or its upstreams
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::UnsupportedProvider(_)
                | AuthError::InvalidState
                | AuthError::MissingCode
                | AuthError::Unauthorized(_)
        )
    }
}

// Repository traits

/// Persistent user directory keyed by `(provider, provider_user_id)`.
///
/// Implementations must guarantee at most one user per external identity,
/// including under concurrent `create_from_oauth` calls for the same pair:
/// a losing writer gets the existing user back rather than an error.
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_provider(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<Option<User>, RepositoryError>;

    async fn create_from_oauth(
        &self,
        provider: Provider,
        provider_user_id: String,
        email: Option<String>,
    ) -> Result<User, RepositoryError>;
}

// Outbound provider calls

#[cfg_attr(any(test, feature = "test-mocks"), automock)]
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Exchange an authorization code for a provider access token
    async fn exchange_code(&self, provider: &ProviderConfig, code: &str)
        -> Result<String, AuthError>;
}

#[cfg_attr(any(test, feature = "test-mocks"), automock)]
#[async_trait]
pub trait IdentityResolverTrait: Send + Sync {
    /// Fetch and normalize the identity behind a provider access token
    async fn fetch(
        &self,
        provider: &ProviderConfig,
        access_token: &str,
    ) -> Result<ExternalIdentity, AuthError>;
}

// Service interfaces
#[async_trait]
pub trait AuthServiceTrait: Send + Sync {
    /// Resolve the provider, mint a state value and build the authorization URL
    async fn start_login(&self, provider: &str) -> Result<LoginStart, AuthError>;

    /// Validate the round trip and turn an authorization code into a session token
    async fn handle_callback(&self, request: CallbackRequest) -> Result<IssuedSession, AuthError>;

    /// Verify a session token presented on a protected request
    fn verify_session_token(&self, token: &str) -> Result<SessionClaims, AuthError>;
}
