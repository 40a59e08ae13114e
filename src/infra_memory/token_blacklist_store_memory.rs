use crate::domain_port::*;
use dashmap::DashMap;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    // None when the TTL does not fit in an `Instant`.
    deadline: Option<Instant>,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }
}

/// Process-local ban store. Expired entries read as absent and are evicted on
/// the read that notices them.
pub struct MemoryTokenBlacklistStore {
    entries: DashMap<String, Entry>,
}

impl MemoryTokenBlacklistStore {
    pub fn new() -> Self {
        MemoryTokenBlacklistStore {
            entries: DashMap::new(),
        }
    }
}

impl Default for MemoryTokenBlacklistStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TokenBlacklistStore for MemoryTokenBlacklistStore {
    async fn string_value(&self, key: &str) -> Result<String, BlacklistStoreError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.expired(now) {
                return Ok(entry.value.clone());
            }
        }

        self.entries.remove_if(key, |_, entry| entry.expired(now));
        Err(BlacklistStoreError::NotFound)
    }

    async fn set_string_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), BlacklistStoreError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: Instant::now().checked_add(ttl),
            },
        );
        Ok(())
    }
}
