use super::ports::{AuthError, OAuthClientTrait};
use super::providers::ProviderConfig;
use async_trait::async_trait;
use oauth2::{AuthorizationCode, TokenResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Build the shared outbound HTTP client.
///
/// Redirects are disabled as the oauth2 crate requires for token requests,
/// and every request is bounded by `timeout`.
pub fn build_http_client(timeout: Duration) -> Result<Client, AuthError> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .user_agent(concat!("vanish-vault-api/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AuthError::ConfigError(format!("Failed to build HTTP client: {e}")))
}

/// OAuth2 authorization-code exchange against a provider token endpoint
pub struct OAuthManager {
    http_client: Client,
}

impl OAuthManager {
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthManager {
    async fn exchange_code(
        &self,
        provider: &ProviderConfig,
        code: &str,
    ) -> Result<String, AuthError> {
        let client = provider.client()?;

        debug!(provider = %provider.provider, "Exchanging authorization code for token");

        // Exchange codes are single use, so a failure here is final
        let token = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(format!("{}: {e}", provider.provider)))?;

        Ok(token.access_token().secret().to_string())
    }
}
