use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Process-local user table. Each row sits behind a single shard lock, which
/// keeps the version increment atomic.
pub struct MemoryUserRepo {
    users: DashMap<UserId, UserRecord>,
    emails: DashMap<String, UserId>,
    next_id: AtomicI64,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        MemoryUserRepo {
            users: DashMap::new(),
            emails: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seed a row as-is, e.g. an account created elsewhere.
    pub fn insert(&self, record: UserRecord) {
        self.next_id
            .fetch_max(record.user_id.0 + 1, Ordering::Relaxed);
        self.emails.insert(record.email.clone(), record.user_id);
        self.users.insert(record.user_id, record);
    }

    pub fn remove(&self, user_id: UserId) {
        if let Some((_, record)) = self.users.remove(&user_id) {
            self.emails.remove(&record.email);
        }
    }
}

impl Default for MemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserId, UserRepoError> {
        let candidate = UserId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let user_id = *self
            .emails
            .entry(email.to_string())
            .or_insert(candidate);
        if user_id != candidate {
            return Err(UserRepoError::AlreadyExists);
        }

        self.users.insert(
            user_id,
            UserRecord {
                user_id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                refresh_token_version: 0,
            },
        );
        Ok(user_id)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserRepoError> {
        let Some(user_id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        self.get_by_id(user_id).await
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, UserRepoError> {
        Ok(self.users.get(&user_id).map(|record| record.value().clone()))
    }
}

#[async_trait::async_trait]
impl RefreshVersionRepo for MemoryUserRepo {
    async fn refresh_version(&self, user_id: UserId) -> Result<i64, RefreshVersionRepoError> {
        self.users
            .get(&user_id)
            .map(|record| record.refresh_token_version)
            .ok_or(RefreshVersionRepoError::NotFound)
    }

    async fn increment_refresh_version(
        &self,
        user_id: UserId,
    ) -> Result<i64, RefreshVersionRepoError> {
        let mut record = self
            .users
            .get_mut(&user_id)
            .ok_or(RefreshVersionRepoError::NotFound)?;
        record.refresh_token_version += 1;
        Ok(record.refresh_token_version)
    }
}
