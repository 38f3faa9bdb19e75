//! Key-value stores backing the advisory lock.
//!
//! Redis is used when a URL is configured; the in-process map covers
//! single-instance runs and tests.

mod in_memory_lock_store;
mod redis_lock_store;

pub use in_memory_lock_store::InMemoryLockStore;
pub use redis_lock_store::RedisLockStore;
