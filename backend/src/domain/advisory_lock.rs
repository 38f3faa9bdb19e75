//! Per-customer advisory lock serialising add and update mutations.
//!
//! A lock is a key-value flag `{Operation}_CustomerId_{id}` set to `"true"`
//! with an expiry. Acquisition uses set-if-absent so two racing requests
//! cannot both win. The returned [`LockGuard`] deletes the flag when
//! released explicitly, and from `Drop` if the request future is cancelled
//! first. The expiry is the backstop when deletion itself fails.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::ports::{LockStore, LockStoreError};
use super::{CustomerId, Error};

/// Value stored while a lock is held.
pub const HELD_FLAG: &str = "true";

/// Default lock expiry.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(60 * 60);

/// Operations guarded by the advisory lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockedOperation {
    AddEnrolledDevice,
    UpdateEnrolledDevice,
    AddServiceLocation,
    UpdateServiceLocation,
}

impl LockedOperation {
    /// Name used in the lock key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddEnrolledDevice => "AddEnrolledDevice",
            Self::UpdateEnrolledDevice => "UpdateEnrolledDevice",
            Self::AddServiceLocation => "AddServiceLocation",
            Self::UpdateServiceLocation => "UpdateServiceLocation",
        }
    }
}

/// Key of one customer's lock for one operation.
///
/// ```
/// use shems::domain::{CustomerId, LockKey, LockedOperation};
///
/// let key = LockKey::new(LockedOperation::AddServiceLocation, CustomerId::new(42).unwrap());
/// assert_eq!(key.as_str(), "AddServiceLocation_CustomerId_42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey(String);

impl LockKey {
    /// Build the key for `operation` on behalf of `customer`.
    #[must_use]
    pub fn new(operation: LockedOperation, customer: CustomerId) -> Self {
        Self(format!("{}_CustomerId_{customer}", operation.name()))
    }

    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reasons a lock could not be taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    /// Another request holds the lock.
    #[error("redis lock already exists")]
    AlreadyLocked { key: String },
    /// The stored flag is not a boolean.
    #[error("error while parsing redis value")]
    InvalidFlag { key: String, value: String },
    /// The key-value store failed.
    #[error(transparent)]
    Store(#[from] LockStoreError),
}

impl From<LockError> for Error {
    fn from(value: LockError) -> Self {
        match value {
            LockError::AlreadyLocked { key } => {
                Self::locked("redis lock already exists")
                    .with_details(serde_json::json!({ "key": key }))
            }
            LockError::InvalidFlag { key, value } => {
                warn!(%key, %value, "unparseable advisory lock flag");
                Self::internal("error while parsing redis value")
            }
            LockError::Store(LockStoreError::Connection { message }) => {
                warn!(%message, "advisory lock store unreachable");
                Self::service_unavailable("lock store unavailable")
            }
            LockError::Store(LockStoreError::Command { message }) => {
                Self::internal(format!("lock store command failed: {message}"))
            }
        }
    }
}

/// Advisory lock over a [`LockStore`].
#[derive(Clone)]
pub struct AdvisoryLock {
    store: Arc<dyn LockStore>,
    ttl: Duration,
}

impl AdvisoryLock {
    /// Create a lock manager whose flags expire after `ttl`.
    pub fn new(store: Arc<dyn LockStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Take the lock for `operation` on behalf of `customer`.
    ///
    /// A flag holding `false` counts as free and is overwritten.
    ///
    /// # Errors
    ///
    /// [`LockError::AlreadyLocked`] when the flag is held,
    /// [`LockError::InvalidFlag`] when it holds something other than a
    /// boolean, and [`LockError::Store`] when the store fails.
    pub async fn acquire(
        &self,
        operation: LockedOperation,
        customer: CustomerId,
    ) -> Result<LockGuard, LockError> {
        let key = LockKey::new(operation, customer);
        if self.try_claim(&key).await? {
            return Ok(self.guard(key));
        }

        match self.store.get(key.as_str()).await? {
            // Expired between the two calls.
            None => {
                if self.try_claim(&key).await? {
                    Ok(self.guard(key))
                } else {
                    Err(LockError::AlreadyLocked { key: key.0 })
                }
            }
            Some(value) => match value.parse::<bool>() {
                Ok(true) => Err(LockError::AlreadyLocked { key: key.0 }),
                Ok(false) => {
                    self.store.set(key.as_str(), HELD_FLAG, self.ttl).await?;
                    Ok(self.guard(key))
                }
                Err(_) => Err(LockError::InvalidFlag { key: key.0, value }),
            },
        }
    }

    async fn try_claim(&self, key: &LockKey) -> Result<bool, LockStoreError> {
        self.store
            .set_if_absent(key.as_str(), HELD_FLAG, self.ttl)
            .await
    }

    fn guard(&self, key: LockKey) -> LockGuard {
        debug!(%key, "advisory lock acquired");
        LockGuard {
            store: Arc::clone(&self.store),
            key,
            armed: true,
        }
    }
}

/// Proof of holding a lock. Release with [`LockGuard::release`].
#[must_use = "dropping the guard releases the lock in the background"]
pub struct LockGuard {
    store: Arc<dyn LockStore>,
    key: LockKey,
    armed: bool,
}

impl LockGuard {
    /// Delete the flag. Failures are logged; the expiry cleans up.
    pub async fn release(mut self) {
        self.armed = false;
        release_flag(self.store.as_ref(), &self.key).await;
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { release_flag(store.as_ref(), &key).await });
            }
            Err(_) => {
                warn!(%key, "advisory lock dropped outside a runtime; left to expire");
            }
        }
    }
}

async fn release_flag(store: &dyn LockStore, key: &LockKey) {
    match store.delete(key.as_str()).await {
        Ok(()) => debug!(%key, "advisory lock released"),
        Err(error) => warn!(%key, %error, "failed to release advisory lock"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockLockStore;
    use mockall::predicate::eq;
    use rstest::rstest;

    const KEY: &str = "UpdateEnrolledDevice_CustomerId_7";

    fn customer() -> CustomerId {
        CustomerId::new(7).expect("valid id")
    }

    fn lock(store: MockLockStore) -> AdvisoryLock {
        AdvisoryLock::new(Arc::new(store), Duration::from_secs(30))
    }

    #[rstest]
    #[case(LockedOperation::AddEnrolledDevice, "AddEnrolledDevice_CustomerId_7")]
    #[case(LockedOperation::UpdateEnrolledDevice, "UpdateEnrolledDevice_CustomerId_7")]
    #[case(LockedOperation::AddServiceLocation, "AddServiceLocation_CustomerId_7")]
    #[case(LockedOperation::UpdateServiceLocation, "UpdateServiceLocation_CustomerId_7")]
    fn keys_name_operation_and_customer(#[case] op: LockedOperation, #[case] expected: &str) {
        assert_eq!(LockKey::new(op, customer()).as_str(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn acquires_absent_flag_and_releases_it() {
        let mut store = MockLockStore::new();
        store
            .expect_set_if_absent()
            .with(eq(KEY), eq(HELD_FLAG), eq(Duration::from_secs(30)))
            .times(1)
            .returning(|_, _, _| Ok(true));
        store
            .expect_delete()
            .with(eq(KEY))
            .times(1)
            .returning(|_| Ok(()));

        let guard = lock(store)
            .acquire(LockedOperation::UpdateEnrolledDevice, customer())
            .await
            .expect("lock acquired");
        guard.release().await;
    }

    #[rstest]
    #[tokio::test]
    async fn held_flag_reports_already_locked_without_deleting() {
        let mut store = MockLockStore::new();
        store.expect_set_if_absent().returning(|_, _, _| Ok(false));
        store
            .expect_get()
            .returning(|_| Ok(Some(HELD_FLAG.to_owned())));
        store.expect_delete().never();

        let err = lock(store)
            .acquire(LockedOperation::UpdateEnrolledDevice, customer())
            .await
            .err()
            .expect("lock is held");
        assert_eq!(
            err,
            LockError::AlreadyLocked {
                key: KEY.to_owned()
            }
        );
        assert_eq!(Error::from(err).code(), ErrorCode::Locked);
    }

    #[rstest]
    #[tokio::test]
    async fn false_flag_is_overwritten() {
        let mut store = MockLockStore::new();
        store.expect_set_if_absent().returning(|_, _, _| Ok(false));
        store.expect_get().returning(|_| Ok(Some("false".to_owned())));
        store
            .expect_set()
            .with(eq(KEY), eq(HELD_FLAG), eq(Duration::from_secs(30)))
            .times(1)
            .returning(|_, _, _| Ok(()));
        store.expect_delete().times(1).returning(|_| Ok(()));

        let guard = lock(store)
            .acquire(LockedOperation::UpdateEnrolledDevice, customer())
            .await
            .expect("false flag is free");
        guard.release().await;
    }

    #[rstest]
    #[tokio::test]
    async fn garbage_flag_is_an_error() {
        let mut store = MockLockStore::new();
        store.expect_set_if_absent().returning(|_, _, _| Ok(false));
        store.expect_get().returning(|_| Ok(Some("maybe".to_owned())));

        let err = lock(store)
            .acquire(LockedOperation::UpdateEnrolledDevice, customer())
            .await
            .err()
            .expect("invalid flag");
        assert!(matches!(err, LockError::InvalidFlag { .. }));
        assert_eq!(Error::from(err).code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn flag_expiring_between_calls_is_claimed_on_retry() {
        let mut store = MockLockStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_set_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(false));
        store
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        store
            .expect_set_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(true));
        store.expect_delete().returning(|_| Ok(()));

        let guard = lock(store)
            .acquire(LockedOperation::UpdateEnrolledDevice, customer())
            .await
            .expect("claimed on retry");
        guard.release().await;
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_store_maps_to_service_unavailable() {
        let mut store = MockLockStore::new();
        store
            .expect_set_if_absent()
            .returning(|_, _, _| Err(LockStoreError::connection("refused")));

        let err = lock(store)
            .acquire(LockedOperation::AddEnrolledDevice, customer())
            .await
            .err()
            .expect("store down");
        assert_eq!(Error::from(err).code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn release_failure_is_swallowed() {
        let mut store = MockLockStore::new();
        store.expect_set_if_absent().returning(|_, _, _| Ok(true));
        store
            .expect_delete()
            .times(1)
            .returning(|_| Err(LockStoreError::command("READONLY")));

        let guard = lock(store)
            .acquire(LockedOperation::AddEnrolledDevice, customer())
            .await
            .expect("acquired");
        guard.release().await;
    }

    #[rstest]
    #[tokio::test]
    async fn dropped_guard_releases_in_background() {
        let (tx, rx) = tokio::sync::oneshot::channel::<String>();
        let tx = std::sync::Mutex::new(Some(tx));
        let mut store = MockLockStore::new();
        store.expect_set_if_absent().returning(|_, _, _| Ok(true));
        store.expect_delete().times(1).returning(move |key| {
            if let Some(sender) = tx.lock().expect("sender lock").take() {
                sender.send(key.to_owned()).expect("receiver alive");
            }
            Ok(())
        });

        let guard = lock(store)
            .acquire(LockedOperation::AddEnrolledDevice, customer())
            .await
            .expect("acquired");
        drop(guard);

        let released = rx.await.expect("release ran");
        assert_eq!(released, "AddEnrolledDevice_CustomerId_7");
    }
}
