use crate::domain_model::{UserData, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("credentials are not valid")]
    InvalidCredentials,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, UserError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, UserError>;
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> Result<UserId, UserError>;
    async fn login(&self, email: &str, password: &str) -> Result<UserId, UserError>;
    async fn user(&self, user_id: UserId) -> Result<UserData, UserError>;
}
