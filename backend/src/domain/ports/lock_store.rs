//! Port for the key-value store holding advisory lock flags.

use std::time::Duration;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by key-value store adapters.
    pub enum LockStoreError {
        /// The store could not be reached.
        Connection { message: String } => "lock store connection failed: {message}",
        /// A command was rejected or returned an unexpected reply.
        Command { message: String } => "lock store command failed: {message}",
    }
}

/// Minimal key-value contract for expiring string flags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Current value of `key`, if set and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, LockStoreError>;

    /// Set `key` unconditionally with an expiry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), LockStoreError>;

    /// Set `key` only if it is absent. Returns whether the write happened.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, LockStoreError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), LockStoreError>;
}
