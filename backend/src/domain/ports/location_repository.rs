//! Port for physical location records.

use async_trait::async_trait;

use crate::domain::{Address, LocationDetails, LocationId};

use super::StoreError;

/// Location storage keyed by the full address tuple.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Find the location with exactly this address.
    async fn find_by_address(&self, address: &Address) -> Result<Option<LocationId>, StoreError>;

    /// Insert a location.
    ///
    /// Fails with [`StoreError::Duplicate`] when another writer inserted the
    /// same address first.
    async fn insert(&self, details: &LocationDetails) -> Result<LocationId, StoreError>;
}
