use std::time::Duration;

/// Ephemeral string store with per-key expiry, holding ban markers.
#[async_trait::async_trait]
pub trait TokenBlacklistStore: Send + Sync {
    /// Fails with [`BlacklistStoreError::NotFound`] when the key is absent or expired.
    async fn string_value(&self, key: &str) -> Result<String, BlacklistStoreError>;

    /// Overwrites `key`; the entry disappears on its own after `ttl`.
    async fn set_string_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), BlacklistStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlacklistStoreError {
    #[error("key not found")]
    NotFound,
    #[error("infra error: {0}")]
    Store(String),
}
