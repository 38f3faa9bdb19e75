//! Redis-backed `LockStore` over a `bb8-redis` pool.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::{RedisConnectionManager, bb8, redis};
use tracing::debug;

use crate::domain::ports::{LockStore, LockStoreError};

const POOL_SIZE: u32 = 8;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(2);

fn map_redis_error(error: redis::RedisError) -> LockStoreError {
    debug!(%error, "redis command failed");
    if error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
    {
        LockStoreError::connection(error.to_string())
    } else {
        LockStoreError::command(error.to_string())
    }
}

/// Redis expiries are whole seconds; never send zero.
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Lock flags stored in Redis with `SET ... EX` expiries.
#[derive(Clone)]
pub struct RedisLockStore {
    pool: bb8::Pool<RedisConnectionManager>,
}

impl RedisLockStore {
    /// Open a pool against `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`LockStoreError::Connection`] when the URL is invalid or the
    /// server cannot be reached.
    pub async fn connect(redis_url: &str) -> Result<Self, LockStoreError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| LockStoreError::connection(err.to_string()))?;
        let pool = bb8::Pool::builder()
            .max_size(POOL_SIZE)
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map_err(|err| LockStoreError::connection(err.to_string()))?;
        Ok(Self { pool })
    }

    async fn conn(
        &self,
    ) -> Result<bb8::PooledConnection<'_, RedisConnectionManager>, LockStoreError> {
        self.pool
            .get()
            .await
            .map_err(|err| LockStoreError::connection(err.to_string()))
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LockStoreError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), LockStoreError> {
        let mut conn = self.conn().await?;
        let (): () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(expiry_secs(ttl))
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, LockStoreError> {
        let mut conn = self.conn().await?;
        // SET NX replies OK when written and nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(expiry_secs(ttl))
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<(), LockStoreError> {
        let mut conn = self.conn().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        debug!(%key, removed, "lock flag deleted");
        Ok(())
    }
}
