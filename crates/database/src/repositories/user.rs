use crate::models::User;
use crate::pool::DbPool;
use crate::repositories::utils::map_db_error;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use services::auth::{Provider, UserId};
use services::common::RepositoryError;
use tracing::debug;
use uuid::Uuid;

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn client(&self) -> Result<deadpool_postgres::Object, RepositoryError> {
        self.pool
            .get()
            .await
            .context("Failed to get database connection")
            .map_err(RepositoryError::PoolError)
    }

    /// Get a user by OAuth provider details
    pub async fn get_by_provider(
        &self,
        auth_provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let client = self.client().await?;

        let row = client
            .query_opt(
                "SELECT * FROM users WHERE auth_provider = $1 AND provider_user_id = $2",
                &[&auth_provider, &provider_user_id],
            )
            .await
            .map_err(map_db_error)?;

        Ok(row.map(row_to_user))
    }

    /// Insert the user for an external identity, or return the row that
    /// already holds it.
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row, so the
    /// statement is a single atomic get-or-create.
    pub async fn upsert_from_oauth(
        &self,
        auth_provider: &str,
        provider_user_id: &str,
        email: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let client = self.client().await?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = client
            .query_one(
                r#"
            INSERT INTO users (id, auth_provider, provider_user_id, email, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (auth_provider, provider_user_id) DO UPDATE SET
                auth_provider = EXCLUDED.auth_provider
            RETURNING *
            "#,
                &[&id, &auth_provider, &provider_user_id, &email, &now],
            )
            .await
            .map_err(map_db_error)?;

        let user = row_to_user(row);
        debug!(
            "Resolved user {} for {}:{}",
            user.id, auth_provider, provider_user_id
        );
        Ok(user)
    }
}

fn row_to_user(row: tokio_postgres::Row) -> User {
    User {
        id: row.get("id"),
        auth_provider: row.get("auth_provider"),
        provider_user_id: row.get("provider_user_id"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }
}

// Convert database User to service User
fn db_user_to_service_user(db_user: User) -> Result<services::auth::User, RepositoryError> {
    let provider = db_user.auth_provider.parse::<Provider>().map_err(|e| {
        RepositoryError::DataConversionError(anyhow::anyhow!(
            "User {} has an unknown provider: {e}",
            db_user.id
        ))
    })?;

    Ok(services::auth::User {
        id: UserId(db_user.id),
        provider,
        provider_user_id: db_user.provider_user_id,
        email: db_user.email,
        created_at: db_user.created_at,
    })
}

// Implement the service trait
#[async_trait]
impl services::auth::UserRepository for UserRepository {
    async fn get_by_provider(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<Option<services::auth::User>, RepositoryError> {
        self.get_by_provider(provider.as_str(), provider_user_id)
            .await?
            .map(db_user_to_service_user)
            .transpose()
    }

    async fn create_from_oauth(
        &self,
        provider: Provider,
        provider_user_id: String,
        email: Option<String>,
    ) -> Result<services::auth::User, RepositoryError> {
        let db_user = self
            .upsert_from_oauth(provider.as_str(), &provider_user_id, email.as_deref())
            .await?;
        db_user_to_service_user(db_user)
    }
}
