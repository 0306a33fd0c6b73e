use super::ports::{AuthError, Provider};
use config::{AuthConfig, OAuthProviderConfig};
use oauth2::{
    basic::BasicClient, AuthUrl, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope, TokenUrl,
};
use std::collections::HashMap;
use tracing::info;

// Type alias for a fully configured OAuth client
pub(crate) type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    oauth2::EndpointSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointSet,
>;

/// Public endpoints and scopes of a provider
struct ProviderDefaults {
    auth_url: &'static str,
    token_url: &'static str,
    userinfo_url: &'static str,
    scopes: &'static [&'static str],
}

impl Provider {
    fn defaults(&self) -> ProviderDefaults {
        match self {
            Provider::Google => ProviderDefaults {
                auth_url: "https://accounts.google.com/o/oauth2/auth",
                token_url: "https://oauth2.googleapis.com/token",
                userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo",
                scopes: &[
                    "https://www.googleapis.com/auth/userinfo.email",
                    "https://www.googleapis.com/auth/userinfo.profile",
                ],
            },
            Provider::GitHub => ProviderDefaults {
                auth_url: "https://github.com/login/oauth/authorize",
                token_url: "https://github.com/login/oauth/access_token",
                userinfo_url: "https://api.github.com/user",
                scopes: &["user:email"],
            },
        }
    }
}

/// Everything needed to talk to one provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl ProviderConfig {
    /// Combine the provider's public endpoints with deployment settings
    pub fn new(provider: Provider, config: OAuthProviderConfig) -> Result<Self, AuthError> {
        let defaults = provider.defaults();

        let provider_config = Self {
            provider,
            client_id: config.client_id,
            client_secret: config.client_secret,
            redirect_url: config.redirect_url,
            scopes: defaults.scopes.iter().map(|s| s.to_string()).collect(),
            auth_url: config
                .auth_url
                .unwrap_or_else(|| defaults.auth_url.to_string()),
            token_url: config
                .token_url
                .unwrap_or_else(|| defaults.token_url.to_string()),
            userinfo_url: config
                .userinfo_url
                .unwrap_or_else(|| defaults.userinfo_url.to_string()),
        };

        // Surface malformed URLs at startup rather than on the first login
        provider_config.client()?;
        url::Url::parse(&provider_config.userinfo_url).map_err(|e| {
            AuthError::ConfigError(format!("Invalid {provider} userinfo URL: {e}"))
        })?;

        Ok(provider_config)
    }

    pub(crate) fn client(&self) -> Result<ConfiguredClient, AuthError> {
        let provider = self.provider;

        let auth_url = AuthUrl::new(self.auth_url.clone())
            .map_err(|e| AuthError::ConfigError(format!("Invalid {provider} auth URL: {e}")))?;

        let token_url = TokenUrl::new(self.token_url.clone())
            .map_err(|e| AuthError::ConfigError(format!("Invalid {provider} token URL: {e}")))?;

        let redirect_url = RedirectUrl::new(self.redirect_url.clone()).map_err(|e| {
            AuthError::ConfigError(format!("Invalid {provider} redirect URL: {e}"))
        })?;

        Ok(BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url))
    }

    /// Build the authorization URL carrying `state` and an offline access hint
    pub fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let client = self.client()?;
        let state = state.to_string();

        let (auth_url, _csrf_state) = client
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .url();

        Ok(auth_url.to_string())
    }
}

/// Lookup table from provider name to its configuration.
///
/// Built once at startup. Providers without credentials are left out and
/// resolve the same way as names that are not providers at all.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<Provider, ProviderConfig>,
}

impl ProviderRegistry {
    pub fn new(configs: impl IntoIterator<Item = ProviderConfig>) -> Self {
        Self {
            providers: configs.into_iter().map(|c| (c.provider, c)).collect(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let mut providers = Vec::new();

        if let Some(google) = config.google.clone() {
            providers.push(ProviderConfig::new(Provider::Google, google)?);
            info!("Google OAuth configured");
        }
        if let Some(github) = config.github.clone() {
            providers.push(ProviderConfig::new(Provider::GitHub, github)?);
            info!("GitHub OAuth configured");
        }

        Ok(Self::new(providers))
    }

    pub fn resolve(&self, name: &str) -> Option<&ProviderConfig> {
        let provider = name.parse::<Provider>().ok()?;
        self.providers.get(&provider)
    }

    pub fn configured(&self) -> Vec<Provider> {
        let mut providers: Vec<_> = self.providers.keys().copied().collect();
        providers.sort();
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_settings(prefix: &str) -> OAuthProviderConfig {
        OAuthProviderConfig {
            client_id: format!("{prefix}-client-id"),
            client_secret: format!("{prefix}-client-secret"),
            redirect_url: format!("http://localhost/api/v1/auth/callback/{prefix}"),
            auth_url: None,
            token_url: None,
            userinfo_url: None,
        }
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::from_config(&AuthConfig {
            google: Some(provider_settings("google")),
            github: Some(provider_settings("github")),
            ..AuthConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_resolves_known_providers() {
        let registry = registry();

        let google = registry.resolve("google").unwrap();
        assert_eq!(google.provider, Provider::Google);
        assert_eq!(google.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(google.scopes.len(), 2);

        let github = registry.resolve("github").unwrap();
        assert_eq!(github.provider, Provider::GitHub);
        assert_eq!(github.scopes, vec!["user:email".to_string()]);
        assert_eq!(github.userinfo_url, "https://api.github.com/user");
    }

    #[test]
    fn test_unknown_provider_is_absent() {
        let registry = registry();
        assert!(registry.resolve("facebook").is_none());
        assert!(registry.resolve("GITHUB").is_none());
    }

    #[test]
    fn test_unconfigured_provider_is_absent() {
        let registry = ProviderRegistry::from_config(&AuthConfig {
            github: Some(provider_settings("github")),
            ..AuthConfig::default()
        })
        .unwrap();

        assert!(registry.resolve("google").is_none());
        assert_eq!(registry.configured(), vec![Provider::GitHub]);
    }

    #[test]
    fn test_endpoint_overrides() {
        let mut settings = provider_settings("google");
        settings.token_url = Some("http://127.0.0.1:9999/token".to_string());
        settings.userinfo_url = Some("http://127.0.0.1:9999/userinfo".to_string());

        let config = ProviderConfig::new(Provider::Google, settings).unwrap();
        assert_eq!(config.token_url, "http://127.0.0.1:9999/token");
        assert_eq!(config.userinfo_url, "http://127.0.0.1:9999/userinfo");
        assert_eq!(config.auth_url, "https://accounts.google.com/o/oauth2/auth");
    }

    #[test]
    fn test_invalid_redirect_url_is_rejected() {
        let mut settings = provider_settings("github");
        settings.redirect_url = "not a url".to_string();

        let err = ProviderConfig::new(Provider::GitHub, settings).unwrap_err();
        assert!(matches!(err, AuthError::ConfigError(_)));
    }

    #[test]
    fn test_authorization_url_carries_state_and_offline_hint() {
        let registry = registry();
        let google = registry.resolve("google").unwrap();

        let url = google.authorization_url("abc123").unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));

        let parsed = url::Url::parse(&url).unwrap();
        let params: HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(params.get("state").map(String::as_str), Some("abc123"));
        assert_eq!(params.get("access_type").map(String::as_str), Some("offline"));
        assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(
            params.get("client_id").map(String::as_str),
            Some("google-client-id")
        );
        assert_eq!(
            params.get("redirect_uri").map(String::as_str),
            Some("http://localhost/api/v1/auth/callback/google")
        );
        assert_eq!(
            params.get("scope").map(String::as_str),
            Some("https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/userinfo.profile")
        );
    }
}
