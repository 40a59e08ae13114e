use crate::domain_model::{AccessClaims, RefreshClaims, UserId};
use serde::Serialize;

/// Every way a credential operation can fail. Variants are compared by kind;
/// only `Internal` carries a message, and it is never shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("token is malformed")]
    TokenMalformed,
    #[error("token signature is invalid")]
    TokenSignatureInvalid,
    #[error("token is expired")]
    TokenExpired,
    #[error("token is in blacklist")]
    TokenInBlackList,
    #[error("invalid refresh version")]
    InvalidRefreshVersion,
    #[error("user not found")]
    UserNotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable identifier sent to clients and written to logs.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::TokenMalformed => "TokenMalformed",
            AuthError::TokenSignatureInvalid => "TokenSignatureInvalid",
            AuthError::TokenExpired => "TokenExpired",
            AuthError::TokenInBlackList => "TokenInBlackList",
            AuthError::InvalidRefreshVersion => "InvalidRefreshVersion",
            AuthError::UserNotFound => "UserNotFound",
            AuthError::Internal(_) => "Internal",
        }
    }

    /// True for failures that mean "log in again", as opposed to infra trouble.
    pub fn is_auth_failure(&self) -> bool {
        !matches!(self, AuthError::Internal(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

pub trait TokenCodec: Send + Sync {
    fn issue_access_token(&self, user: UserId) -> Result<AccessToken, AuthError>;
    fn issue_refresh_token(&self, user: UserId, version: i64)
    -> Result<RefreshToken, AuthError>;
    fn parse_access_token(&self, token: &str) -> Result<AccessClaims, AuthError>;
    fn parse_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verify an access token and return the user it was issued to.
    async fn access(&self, access_token: &str) -> Result<UserId, AuthError>;
    /// Rotate a refresh token into a brand new pair.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;
    /// Issue a fresh pair for a user that just proved their identity.
    async fn tokens(&self, user_id: UserId) -> Result<AuthTokens, AuthError>;
    /// Blacklist the presented pair and return its owner.
    async fn ban_tokens(&self, access_token: &str, refresh_token: &str)
    -> Result<UserId, AuthError>;
}
