use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AccessTokenConfig {
    pub ttl: Duration,
    pub blacklist_enabled: bool,
    pub ban_key_prefix: String,
}

#[derive(Debug, Clone)]
pub struct RefreshTokenConfig {
    pub ttl: Duration,
    pub ban_key_prefix: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access: AccessTokenConfig,
    pub refresh: RefreshTokenConfig,
}

impl From<RefreshVersionRepoError> for AuthError {
    fn from(error: RefreshVersionRepoError) -> Self {
        match error {
            RefreshVersionRepoError::NotFound => AuthError::UserNotFound,
            RefreshVersionRepoError::Store(e) => AuthError::Internal(e),
        }
    }
}

impl From<BlacklistStoreError> for AuthError {
    fn from(error: BlacklistStoreError) -> Self {
        AuthError::Internal(error.to_string())
    }
}

/// Issues, verifies, rotates and revokes access/refresh pairs.
///
/// Holds no mutable state of its own: the refresh version counter lives in the
/// [`RefreshVersionRepo`] and ban markers live in the [`TokenBlacklistStore`].
/// A ban marker for `(class, uid)` stores the `exp` of the last banned token of
/// that class and covers every token of the class with `exp <= marker`.
pub struct RealAuthService {
    token_codec: Arc<dyn TokenCodec>,
    version_repo: Arc<dyn RefreshVersionRepo>,
    blacklist_store: Arc<dyn TokenBlacklistStore>,
    cfg: AuthConfig,
}

impl RealAuthService {
    pub fn new(
        token_codec: Arc<dyn TokenCodec>,
        version_repo: Arc<dyn RefreshVersionRepo>,
        blacklist_store: Arc<dyn TokenBlacklistStore>,
        cfg: AuthConfig,
    ) -> Self {
        Self {
            token_codec,
            version_repo,
            blacklist_store,
            cfg,
        }
    }

    fn ban_key(&self, class: TokenClass, user_id: UserId) -> String {
        let prefix = match class {
            TokenClass::Access => &self.cfg.access.ban_key_prefix,
            TokenClass::Refresh => &self.cfg.refresh.ban_key_prefix,
        };
        format!("{}:{}", prefix, user_id)
    }

    async fn ban_expiry(
        &self,
        class: TokenClass,
        user_id: UserId,
    ) -> Result<Option<i64>, AuthError> {
        let value = match self
            .blacklist_store
            .string_value(&self.ban_key(class, user_id))
            .await
        {
            Ok(value) => value,
            Err(BlacklistStoreError::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let exp = value.parse::<i64>().map_err(|e| {
            AuthError::Internal(format!("bad {} ban expiry {:?}: {}", class, value, e))
        })?;
        Ok(Some(exp))
    }

    async fn ban(
        &self,
        class: TokenClass,
        user_id: UserId,
        exp: i64,
        ttl: Duration,
    ) -> Result<(), AuthError> {
        self.blacklist_store
            .set_string_with_ttl(&self.ban_key(class, user_id), &exp.to_string(), ttl)
            .await?;
        debug!(%class, %user_id, exp, "token banned");
        Ok(())
    }

    fn issue(&self, user_id: UserId, version: i64) -> Result<AuthTokens, AuthError> {
        Ok(AuthTokens {
            access_token: self.token_codec.issue_access_token(user_id)?,
            refresh_token: self.token_codec.issue_refresh_token(user_id, version)?,
        })
    }

    async fn verify_access(&self, access_token: &str) -> Result<UserId, AuthError> {
        let claims = self.token_codec.parse_access_token(access_token)?;

        if !self.cfg.access.blacklist_enabled {
            return Ok(claims.uid);
        }

        match self.ban_expiry(TokenClass::Access, claims.uid).await? {
            Some(ban_exp) if ban_exp >= claims.exp => Err(AuthError::TokenInBlackList),
            _ => Ok(claims.uid),
        }
    }

    async fn rotate(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let claims = self.token_codec.parse_refresh_token(refresh_token)?;
        let user_id = claims.uid;

        let version = match self.ban_expiry(TokenClass::Refresh, user_id).await? {
            // No ban on record: rotate without comparing the presented version.
            None => self.version_repo.increment_refresh_version(user_id).await?,
            Some(ban_exp) => {
                if ban_exp >= claims.exp {
                    return Err(AuthError::TokenInBlackList);
                }
                let current = self.version_repo.refresh_version(user_id).await?;
                if current != claims.version {
                    return Err(AuthError::InvalidRefreshVersion);
                }
                self.version_repo.increment_refresh_version(user_id).await?
            }
        };

        debug!(%user_id, from = claims.version, to = version, "refresh token rotated");
        self.issue(user_id, version)
    }

    async fn issue_for(&self, user_id: UserId) -> Result<AuthTokens, AuthError> {
        let current = self.version_repo.refresh_version(user_id).await?;
        let version = self.version_repo.increment_refresh_version(user_id).await?;

        debug!(%user_id, from = current, to = version, "tokens issued");
        self.issue(user_id, version)
    }

    async fn revoke(&self, access_token: &str, refresh_token: &str) -> Result<UserId, AuthError> {
        let refresh = self.token_codec.parse_refresh_token(refresh_token)?;
        self.ban(
            TokenClass::Refresh,
            refresh.uid,
            refresh.exp,
            self.cfg.refresh.ttl,
        )
        .await?;

        if !self.cfg.access.blacklist_enabled {
            return Ok(refresh.uid);
        }

        let access = self.token_codec.parse_access_token(access_token)?;
        self.ban(
            TokenClass::Access,
            access.uid,
            access.exp,
            self.cfg.access.ttl,
        )
        .await?;

        Ok(refresh.uid)
    }
}

fn log_failure(op: &'static str, error: &AuthError) {
    if error.is_auth_failure() {
        warn!(op, code = error.code(), "credential rejected");
    } else {
        error!(op, %error, "credential operation failed");
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn access(&self, access_token: &str) -> Result<UserId, AuthError> {
        self.verify_access(access_token)
            .await
            .inspect_err(|e| log_failure("access", e))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        self.rotate(refresh_token)
            .await
            .inspect_err(|e| log_failure("refresh", e))
    }

    async fn tokens(&self, user_id: UserId) -> Result<AuthTokens, AuthError> {
        self.issue_for(user_id)
            .await
            .inspect_err(|e| log_failure("tokens", e))
    }

    async fn ban_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<UserId, AuthError> {
        self.revoke(access_token, refresh_token)
            .await
            .inspect_err(|e| log_failure("ban_tokens", e))
    }
}
