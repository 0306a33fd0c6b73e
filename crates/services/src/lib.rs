pub mod auth;
pub mod common;
pub mod health;

pub use auth::{AuthError, AuthService, AuthServiceTrait, Provider, UserId};
pub use common::RepositoryError;
pub use health::HealthCheckTrait;
