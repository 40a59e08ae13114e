use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

pub struct RedisTokenBlacklistStore {
    conn: ConnectionManager,
}

impl RedisTokenBlacklistStore {
    pub fn new(conn: ConnectionManager) -> Self {
        RedisTokenBlacklistStore { conn }
    }

    // SET EX rejects 0; sub-second TTLs round up to one second.
    fn ttl_secs(ttl: Duration) -> u64 {
        ttl.as_secs().max(1)
    }
}

#[async_trait::async_trait]
impl TokenBlacklistStore for RedisTokenBlacklistStore {
    async fn string_value(&self, key: &str) -> Result<String, BlacklistStoreError> {
        let mut conn = self.conn.clone();
        let val: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| BlacklistStoreError::Store(e.to_string()))?;
        val.ok_or(BlacklistStoreError::NotFound)
    }

    async fn set_string_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), BlacklistStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, value, Self::ttl_secs(ttl))
            .await
            .map_err(|e| BlacklistStoreError::Store(e.to_string()))?;
        Ok(())
    }
}
