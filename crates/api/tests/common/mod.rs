#![allow(dead_code)]

use api::{build_app, init_auth_services, routes::health::HealthState};
use axum_test::TestServer;
use config::{ApiConfig, AuthConfig, OAuthProviderConfig};
use httpmock::prelude::*;
use serde_json::json;
use services::auth::memory::InMemoryUserRepository;
use services::health::MockHealthCheckTrait;
use std::sync::Arc;

pub const JWT_SECRET: &str = "e2e-test-secret";
pub const GITHUB_USER_ID: u64 = 583231;

/// A running API wired to a mock identity provider and an in-memory user directory
pub struct TestApp {
    pub server: TestServer,
    pub provider: MockServer,
    pub users: Arc<InMemoryUserRepository>,
}

fn provider_settings(name: &str, provider: &MockServer) -> OAuthProviderConfig {
    OAuthProviderConfig {
        client_id: format!("{name}-client-id"),
        client_secret: format!("{name}-client-secret"),
        redirect_url: format!("http://localhost:8080/api/v1/auth/callback/{name}"),
        // Authorization stays on the real host, so login URLs look like production
        auth_url: None,
        token_url: Some(provider.url(format!("/{name}/token"))),
        userinfo_url: Some(provider.url(format!("/{name}/user"))),
    }
}

/// Helper function to create a test configuration
pub fn test_config(provider: &MockServer) -> ApiConfig {
    ApiConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        logging: config::LoggingConfig {
            level: "debug".to_string(),
            format: "compact".to_string(),
            modules: std::collections::HashMap::new(),
        },
        auth: AuthConfig {
            google: Some(provider_settings("google", provider)),
            github: Some(provider_settings("github", provider)),
            jwt_secret: Some(JWT_SECRET.to_string()),
            jwt_expiration_hours: 24,
            http_timeout_secs: 5,
        },
        database: config::DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            database: "vanish_vault_test".to_string(),
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            max_connections: 2,
        },
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|config| config).await
}

/// Setup a test server, letting the caller adjust configuration first
pub async fn setup_test_app_with(adjust: impl FnOnce(ApiConfig) -> ApiConfig) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::level_filters::LevelFilter::DEBUG)
        .try_init();

    let provider = MockServer::start_async().await;
    let config = adjust(test_config(&provider));

    let users = Arc::new(InMemoryUserRepository::new());
    let auth_components =
        init_auth_services(users.clone(), &config).expect("Failed to initialize auth services");

    let mut health = MockHealthCheckTrait::new();
    health.expect_check_database().returning(|| Ok(()));
    let health: HealthState = Arc::new(health);

    let server = TestServer::new(build_app(auth_components, health))
        .expect("Failed to create test server");

    TestApp {
        server,
        provider,
        users,
    }
}

/// Stub a successful GitHub token exchange and userinfo lookup
pub async fn mock_github_success(provider: &MockServer) {
    provider
        .mock_async(|when, then| {
            when.method(POST).path("/github/token");
            then.status(200).json_body(json!({
                "access_token": "gho_e2e",
                "token_type": "bearer",
                "scope": "user:email"
            }));
        })
        .await;

    provider
        .mock_async(|when, then| {
            when.method(GET)
                .path("/github/user")
                .header("authorization", "Bearer gho_e2e");
            then.status(200).json_body(json!({
                "id": GITHUB_USER_ID,
                "login": "octocat",
                "email": "octocat@example.com"
            }));
        })
        .await;
}

/// All `Set-Cookie` header values on a response
pub fn set_cookies(response: &axum_test::TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

/// Value of the `oauth_state` cookie set by a response, if any
pub fn state_cookie_value(response: &axum_test::TestResponse) -> Option<String> {
    set_cookies(response).into_iter().find_map(|cookie| {
        cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix("oauth_state="))
            .map(str::to_string)
    })
}
