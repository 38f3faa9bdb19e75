//! Advisory lock behaviour over the in-process store.

use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};
use shems::domain::{AdvisoryLock, CustomerId, ErrorCode, LockError, LockedOperation};
use shems::test_support::InMemoryLockStore;

#[fixture]
fn lock() -> AdvisoryLock {
    AdvisoryLock::new(Arc::new(InMemoryLockStore::new()), Duration::from_secs(60))
}

fn customer(raw: i32) -> CustomerId {
    CustomerId::new(raw).expect("customer id")
}

#[rstest]
#[tokio::test]
async fn second_acquire_fails_until_release(lock: AdvisoryLock) {
    let held = lock
        .acquire(LockedOperation::AddEnrolledDevice, customer(1))
        .await
        .expect("first acquire");

    let err = lock
        .acquire(LockedOperation::AddEnrolledDevice, customer(1))
        .await
        .err()
        .expect("second acquire is refused");
    assert!(matches!(err, LockError::AlreadyLocked { .. }));
    assert_eq!(shems::domain::Error::from(err).code(), ErrorCode::Locked);

    held.release().await;

    lock.acquire(LockedOperation::AddEnrolledDevice, customer(1))
        .await
        .expect("acquire after release")
        .release()
        .await;
}

#[rstest]
#[tokio::test]
async fn locks_are_scoped_by_operation_and_customer(lock: AdvisoryLock) {
    let held = lock
        .acquire(LockedOperation::AddEnrolledDevice, customer(1))
        .await
        .expect("first acquire");

    let other_operation = lock
        .acquire(LockedOperation::UpdateEnrolledDevice, customer(1))
        .await
        .expect("different operation");
    let other_customer = lock
        .acquire(LockedOperation::AddEnrolledDevice, customer(2))
        .await
        .expect("different customer");

    other_customer.release().await;
    other_operation.release().await;
    held.release().await;
}
