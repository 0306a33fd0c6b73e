use async_trait::async_trait;

#[cfg(any(test, feature = "test-mocks"))]
use mockall::automock;

/// Liveness check for the backing store
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
#[async_trait]
pub trait HealthCheckTrait: Send + Sync {
    async fn check_database(&self) -> anyhow::Result<()>;
}
