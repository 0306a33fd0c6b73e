// API Middleware
//
// Bearer session-token verification for protected routes.

pub mod auth;

pub use auth::{auth_middleware, AuthState, AuthenticatedUser};
