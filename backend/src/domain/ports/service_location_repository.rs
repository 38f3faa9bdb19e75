//! Port for service location persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    CustomerId, LocationId, ServiceLocation, ServiceLocationDraft, ServiceLocationId,
    ServiceLocationInsert,
};

use super::StoreError;

/// Column changes applied by [`ServiceLocationRepository::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLocationChange {
    pub id: ServiceLocationId,
    pub location_id: LocationId,
    pub date_taken_over: NaiveDate,
    pub occupants_count: i32,
}

/// Service location storage.
///
/// Reads do not filter on the active flag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceLocationRepository: Send + Sync {
    /// All service locations held by `customer`, joined to their location.
    async fn list_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<ServiceLocation>, StoreError>;

    /// Whether `id` exists and belongs to `customer`.
    async fn is_owned_by(
        &self,
        id: ServiceLocationId,
        customer: CustomerId,
    ) -> Result<bool, StoreError>;

    /// The customer's service location at `location`, if any.
    async fn find_at_location(
        &self,
        customer: CustomerId,
        location: LocationId,
    ) -> Result<Option<ServiceLocationId>, StoreError>;

    /// Resolve or create the location, then insert the service location,
    /// all in one transaction.
    ///
    /// Reports [`ServiceLocationInsert::AlreadyExists`] without writing when
    /// the customer already holds a service location at the address.
    async fn insert_unique(
        &self,
        draft: &ServiceLocationDraft,
    ) -> Result<ServiceLocationInsert, StoreError>;

    /// Point an existing service location at a location and update its
    /// occupancy details.
    async fn update(&self, change: &ServiceLocationChange) -> Result<(), StoreError>;

    /// Clear the active flag.
    async fn deactivate(&self, id: ServiceLocationId) -> Result<(), StoreError>;
}
