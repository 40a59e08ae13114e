use crate::domain_model::UserId;

/// Persistent per-user refresh version counter.
///
/// Rows are created by [`super::UserRepo`]; this port only reads and bumps
/// them. `increment_refresh_version` must be a single atomic step on the
/// backing store and returns the value after the increment.
#[async_trait::async_trait]
pub trait RefreshVersionRepo: Send + Sync {
    async fn refresh_version(&self, user_id: UserId) -> Result<i64, RefreshVersionRepoError>;

    async fn increment_refresh_version(
        &self,
        user_id: UserId,
    ) -> Result<i64, RefreshVersionRepoError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshVersionRepoError {
    #[error("user row not found")]
    NotFound,
    #[error("infra error: {0}")]
    Store(String),
}
