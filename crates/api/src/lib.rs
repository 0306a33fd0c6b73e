pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;

use crate::{
    middleware::{auth_middleware, AuthState},
    openapi::ApiDoc,
    routes::{
        auth::{callback, login, refresh},
        health::{health_check, HealthState},
        rooms, secrets,
    },
};
use axum::{
    middleware::from_fn_with_state,
    response::Html,
    routing::{get, post},
    Router,
};
use config::ApiConfig;
use database::Database;
use services::auth::{AuthError, AuthService, AuthServiceTrait, UserRepository};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Service initialization components
pub struct AuthComponents {
    pub auth_service: Arc<dyn AuthServiceTrait>,
    pub auth_state_middleware: AuthState,
}

/// Initialize database connection and run migrations
pub async fn init_database(db_config: &config::DatabaseConfig) -> anyhow::Result<Arc<Database>> {
    let database = Arc::new(Database::from_config(db_config).await?);

    tracing::info!("Starting database migrations...");
    database.run_migrations().await?;
    tracing::info!("Database migrations completed.");

    Ok(database)
}

/// Initialize authentication services and middleware
pub fn init_auth_services(
    user_repository: Arc<dyn UserRepository>,
    config: &ApiConfig,
) -> Result<AuthComponents, AuthError> {
    let auth_service: Arc<dyn AuthServiceTrait> =
        Arc::new(AuthService::from_config(&config.auth, user_repository)?);

    Ok(AuthComponents {
        auth_state_middleware: AuthState::new(auth_service.clone()),
        auth_service,
    })
}

/// Build the complete application router
pub fn build_app(auth_components: AuthComponents, health: HealthState) -> Router {
    let auth_routes = build_auth_routes(auth_components.auth_service.clone());
    let room_routes = build_room_routes(&auth_components.auth_state_middleware);

    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", auth_routes)
                .merge(room_routes),
        )
        .route("/healthz", get(health_check).with_state(health))
        .merge(build_openapi_routes())
        .layer(TraceLayer::new_for_http())
}

/// Build authentication routes
pub fn build_auth_routes(auth_service: Arc<dyn AuthServiceTrait>) -> Router {
    Router::new()
        .route("/login/{provider}", get(login))
        .route("/callback/{provider}", get(callback))
        .route("/refresh", post(refresh))
        .with_state(auth_service)
}

/// Build room and secret routes, all behind the bearer guard
pub fn build_room_routes(auth_state_middleware: &AuthState) -> Router {
    Router::new()
        .route("/rooms", post(rooms::create_room).get(rooms::list_rooms))
        .route(
            "/rooms/{id}",
            get(rooms::get_room).delete(rooms::delete_room),
        )
        .route("/rooms/{id}/join", post(rooms::join_room))
        .route("/rooms/{id}/leave", post(rooms::leave_room))
        .route(
            "/rooms/{id}/secrets",
            post(secrets::create_secret).get(secrets::list_secrets),
        )
        .route("/rooms/{id}/secrets/{secret_id}", get(secrets::get_secret))
        .layer(from_fn_with_state(
            auth_state_middleware.clone(),
            auth_middleware,
        ))
}

/// Build OpenAPI documentation routes
pub fn build_openapi_routes() -> Router {
    Router::new().route("/docs", get(swagger_ui_handler)).route(
        "/api-docs/openapi.json",
        get(|| async { axum::Json(ApiDoc::openapi()) }),
    )
}

/// Serve Swagger UI HTML page
async fn swagger_ui_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Vanish Vault API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui.css" />
    <style>
        html {
            box-sizing: border-box;
            overflow-y: scroll;
        }
        *, *:before, *:after {
            box-sizing: inherit;
        }
        body {
            margin: 0;
            background: #fafafa;
        }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5.10.5/swagger-ui-standalone-preset.js"></script>
    <script>
    window.onload = function() {
        window.ui = SwaggerUIBundle({
            url: '/api-docs/openapi.json',
            dom_id: '#swagger-ui',
            deepLinking: true,
            presets: [
                SwaggerUIBundle.presets.apis,
                SwaggerUIStandalonePreset
            ],
            layout: "StandaloneLayout",
            // Keep the bearer token across page reloads
            persistAuthorization: true,
            docExpansion: 'list'
        });
    };
    </script>
</body>
</html>"#,
    )
}
