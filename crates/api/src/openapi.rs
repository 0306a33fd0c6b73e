use crate::models::*;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vanish Vault API",
        description = "Private rooms with burn-on-read secrets.\n\n## Authentication\n\nSign in through `/api/v1/auth/login/{provider}` (google or github). The callback returns a session token; send it as `Authorization: Bearer <token>` on room and secret endpoints.",
        version = "1.0.0",
        license(
            name = "Apache-2.0",
        )
    ),
    paths(
        // Auth endpoints
        crate::routes::auth::login,
        crate::routes::auth::callback,
        crate::routes::auth::refresh,
        // Room endpoints
        crate::routes::rooms::create_room,
        crate::routes::rooms::list_rooms,
        crate::routes::rooms::get_room,
        crate::routes::rooms::delete_room,
        crate::routes::rooms::join_room,
        crate::routes::rooms::leave_room,
        // Secret endpoints
        crate::routes::secrets::create_secret,
        crate::routes::secrets::list_secrets,
        crate::routes::secrets::get_secret,
        // Infra
        crate::routes::health::health_check,
    ),
    components(
        schemas(ErrorResponse, LoginResponse, TokenResponse, HealthResponse),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "OAuth login and session issuance"),
        (name = "Rooms", description = "Private rooms"),
        (name = "Secrets", description = "Burn-on-read secrets"),
        (name = "Infra", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

/// Security configuration for OpenAPI
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // Session tokens issued by the OAuth callback
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
