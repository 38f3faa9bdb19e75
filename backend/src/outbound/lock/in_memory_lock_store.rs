//! Process-local `LockStore` for single-instance deployments and tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{LockStore, LockStoreError};

#[derive(Debug)]
struct Entry {
    value: String,
    /// `None` when `now + ttl` is not representable; such entries never expire.
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: &str, now: Instant, ttl: Duration) -> Self {
        Self {
            value: value.to_owned(),
            expires_at: now.checked_add(ttl),
        }
    }

    fn live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// TTL map guarded by an async mutex. Expired entries read as absent.
#[derive(Debug, Default)]
pub struct InMemoryLockStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryLockStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LockStoreError> {
        let entries = self.entries.lock().await;
        let now = Instant::now();
        Ok(entries
            .get(key)
            .filter(|entry| entry.live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), LockStoreError> {
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), Entry::new(value, Instant::now(), ttl));
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, LockStoreError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        if entries.get(key).is_some_and(|entry| entry.live(now)) {
            return Ok(false);
        }
        entries.insert(key.to_owned(), Entry::new(value, now, ttl));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), LockStoreError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
