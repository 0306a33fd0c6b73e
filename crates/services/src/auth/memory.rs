use super::ports::{Provider, User, UserId, UserRepository};
use crate::common::RepositoryError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory user directory for tests and local wiring.
///
/// Create-or-get runs under a single lock, so concurrent creates for the
/// same identity observe one user.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<(Provider, String), User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_provider(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users
            .get(&(provider, provider_user_id.to_string()))
            .cloned())
    }

    async fn create_from_oauth(
        &self,
        provider: Provider,
        provider_user_id: String,
        email: Option<String>,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        let user = users
            .entry((provider, provider_user_id.clone()))
            .or_insert_with(|| User {
                id: UserId(Uuid::new_v4()),
                provider,
                provider_user_id,
                email,
                created_at: Utc::now(),
            });

        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_is_idempotent_per_identity() {
        let repo = InMemoryUserRepository::new();

        let first = repo
            .create_from_oauth(Provider::GitHub, "42".into(), Some("a@example.com".into()))
            .await
            .unwrap();
        let second = repo
            .create_from_oauth(Provider::GitHub, "42".into(), None)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.email.as_deref(), Some("a@example.com"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_same_external_id_on_other_provider_is_distinct() {
        let repo = InMemoryUserRepository::new();

        let github = repo
            .create_from_oauth(Provider::GitHub, "42".into(), None)
            .await
            .unwrap();
        let google = repo
            .create_from_oauth(Provider::Google, "42".into(), None)
            .await
            .unwrap();

        assert_ne!(github.id, google.id);
        assert_eq!(
            repo.get_by_provider(Provider::Google, "42")
                .await
                .unwrap()
                .map(|u| u.id),
            Some(google.id)
        );
        assert!(repo
            .get_by_provider(Provider::Google, "43")
            .await
            .unwrap()
            .is_none());
    }
}
