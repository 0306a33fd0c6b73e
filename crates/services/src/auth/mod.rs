pub mod identity;
#[cfg(any(test, feature = "test-mocks"))]
pub mod memory;
pub mod oauth;
pub mod ports;
pub mod providers;
pub mod session;
pub mod state;

pub use identity::IdentityResolver;
pub use oauth::{build_http_client, OAuthManager};
pub use ports::*;
pub use providers::{ProviderConfig, ProviderRegistry};
pub use session::SessionTokenIssuer;

use async_trait::async_trait;
use config::AuthConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::common::RepositoryError;

pub const TOKEN_TYPE: &str = "Bearer";

pub struct AuthService {
    providers: Arc<ProviderRegistry>,
    oauth_client: Arc<dyn OAuthClientTrait>,
    identity_resolver: Arc<dyn IdentityResolverTrait>,
    user_repository: Arc<dyn UserRepository>,
    token_issuer: Arc<SessionTokenIssuer>,
    storage_timeout: Duration,
}

impl AuthService {
    pub fn new(
        providers: Arc<ProviderRegistry>,
        oauth_client: Arc<dyn OAuthClientTrait>,
        identity_resolver: Arc<dyn IdentityResolverTrait>,
        user_repository: Arc<dyn UserRepository>,
        token_issuer: Arc<SessionTokenIssuer>,
        storage_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            oauth_client,
            identity_resolver,
            user_repository,
            token_issuer,
            storage_timeout,
        }
    }

    /// Wire the production OAuth client and identity resolver from configuration
    pub fn from_config(
        config: &AuthConfig,
        user_repository: Arc<dyn UserRepository>,
    ) -> Result<Self, AuthError> {
        let timeout = Duration::from_secs(config.http_timeout_secs);
        let http_client = build_http_client(timeout)?;
        let providers = ProviderRegistry::from_config(config)?;

        if providers.configured().is_empty() {
            warn!("No OAuth providers configured, every login will be rejected");
        }
        if config.jwt_secret.as_deref().unwrap_or_default().is_empty() {
            warn!("JWT_SECRET is not set, session tokens cannot be issued");
        }

        Ok(Self::new(
            Arc::new(providers),
            Arc::new(OAuthManager::new(http_client.clone())),
            Arc::new(IdentityResolver::new(http_client)),
            user_repository,
            Arc::new(SessionTokenIssuer::from_config(config)),
            timeout,
        ))
    }

    fn resolve_provider(&self, name: &str) -> Result<&ProviderConfig, AuthError> {
        self.providers
            .resolve(name)
            .ok_or_else(|| AuthError::UnsupportedProvider(name.to_string()))
    }

    async fn bounded<T>(
        &self,
        operation: impl Future<Output = Result<T, RepositoryError>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.storage_timeout, operation).await {
            Ok(result) => result.map_err(|e| AuthError::UserPersistenceFailed(e.to_string())),
            Err(_) => Err(AuthError::UserPersistenceFailed(format!(
                "User directory did not respond within {:?}",
                self.storage_timeout
            ))),
        }
    }

    /// Get-or-create the local user for an external identity
    async fn resolve_user(&self, identity: ExternalIdentity) -> Result<User, AuthError> {
        let existing = self
            .bounded(
                self.user_repository
                    .get_by_provider(identity.provider, &identity.external_id),
            )
            .await?;

        if let Some(user) = existing {
            debug!(user_id = %user.id, provider = %identity.provider, "Found existing user");
            return Ok(user);
        }

        let user = self
            .bounded(self.user_repository.create_from_oauth(
                identity.provider,
                identity.external_id,
                identity.email,
            ))
            .await?;

        info!(user_id = %user.id, provider = %user.provider, "Resolved new user from OAuth login");
        Ok(user)
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn start_login(&self, provider: &str) -> Result<LoginStart, AuthError> {
        let config = self.resolve_provider(provider)?;
        let state = state::generate_state()
            .inspect_err(|e| error!(provider = %config.provider, "State generation failed: {e}"))?;
        let url = config
            .authorization_url(&state)
            .inspect_err(|e| error!(provider = %config.provider, "Authorization URL failed: {e}"))?;

        debug!(provider = %config.provider, "Starting OAuth login");

        Ok(LoginStart {
            provider: config.provider,
            url,
            state,
        })
    }

    async fn handle_callback(&self, request: CallbackRequest) -> Result<IssuedSession, AuthError> {
        state::validate_state(request.state.as_deref(), request.state_cookie.as_deref())?;

        let config = self.resolve_provider(&request.provider)?;
        let provider = config.provider;

        let code = request
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCode)?;

        let access_token = self
            .oauth_client
            .exchange_code(config, code)
            .await
            .inspect_err(|e| error!(%provider, "Code exchange failed: {e}"))?;

        let identity = self
            .identity_resolver
            .fetch(config, &access_token)
            .await
            .inspect_err(|e| error!(%provider, "Identity resolution failed: {e}"))?;

        let user = self
            .resolve_user(identity)
            .await
            .inspect_err(|e| error!(%provider, "User resolution failed: {e}"))?;

        let issued = self
            .token_issuer
            .issue(&user.id)
            .inspect_err(|e| error!(%provider, user_id = %user.id, "Token issuance failed: {e}"))?;

        info!(%provider, user_id = %user.id, "OAuth login completed");

        Ok(IssuedSession {
            user_id: user.id,
            token: issued.token,
            token_type: TOKEN_TYPE,
            expires_at: issued.expires_at,
        })
    }

    fn verify_session_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.token_issuer.verify(token)
    }
}
