use crate::domain_model::*;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: String,
    pub refresh_token_version: i64,
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a row with `refresh_token_version = 0` and return its id.
    async fn create_user(&self, email: &str, password_hash: &str)
    -> Result<UserId, UserRepoError>;

    /// Fetch credentials by email (for login).
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserRepoError>;

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, UserRepoError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UserRepoError {
    #[error("email already registered")]
    AlreadyExists,
    #[error("infra error: {0}")]
    Store(String),
}
