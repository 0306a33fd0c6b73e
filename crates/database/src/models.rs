use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Row of the `users` table
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    /// OAuth provider wire name (google, github)
    pub auth_provider: String,
    /// Provider's stable user ID
    pub provider_user_id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}
