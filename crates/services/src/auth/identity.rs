use super::ports::{AuthError, ExternalIdentity, IdentityResolverTrait, Provider};
use super::providers::ProviderConfig;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, error};

/// Calls a provider's userinfo endpoint and normalizes the payload
pub struct IdentityResolver {
    http_client: Client,
}

impl IdentityResolver {
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl IdentityResolverTrait for IdentityResolver {
    async fn fetch(
        &self,
        provider: &ProviderConfig,
        access_token: &str,
    ) -> Result<ExternalIdentity, AuthError> {
        debug!(provider = %provider.provider, "Fetching user info");

        let response = self
            .http_client
            .get(&provider.userinfo_url)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                AuthError::UserInfoFetchFailed(format!(
                    "Failed to reach {} userinfo endpoint: {e}",
                    provider.provider
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                provider = %provider.provider,
                status = status.as_u16(),
                "Provider returned error status"
            );
            return Err(AuthError::UserInfoFetchFailed(format!(
                "{} userinfo endpoint returned status: {status}",
                provider.provider
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            AuthError::UserInfoFetchFailed(format!("Failed to read {} user: {e}", provider.provider))
        })?;

        normalize(provider.provider, &body)
    }
}

#[derive(Debug, Deserialize)]
struct GoogleUser {
    #[serde(alias = "sub")]
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: u64,
    #[serde(default)]
    email: Option<String>,
}

/// Turn a provider-specific userinfo body into an `ExternalIdentity`
fn normalize(provider: Provider, body: &[u8]) -> Result<ExternalIdentity, AuthError> {
    let decode_error =
        |e: serde_json::Error| AuthError::UserInfoFetchFailed(format!("Failed to parse {provider} user: {e}"));

    let (external_id, email) = match provider {
        Provider::Google => {
            let user: GoogleUser = serde_json::from_slice(body).map_err(decode_error)?;
            (user.id, user.email)
        }
        Provider::GitHub => {
            let user: GitHubUser = serde_json::from_slice(body).map_err(decode_error)?;
            (user.id.to_string(), user.email)
        }
    };

    if external_id.is_empty() {
        return Err(AuthError::UserInfoFetchFailed(format!(
            "{provider} user has an empty id"
        )));
    }

    Ok(ExternalIdentity {
        provider,
        external_id,
        email: email.filter(|e| !e.is_empty()),
    })
}
