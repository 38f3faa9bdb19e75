//! Driving ports for managing service locations.

use async_trait::async_trait;

use crate::domain::{
    CustomerId, Error, ServiceLocation, ServiceLocationDraft, ServiceLocationId,
    ServiceLocationUpdate,
};

/// Mutating service location use-cases.
///
/// Add and update are serialised per customer by an advisory lock; a
/// concurrent duplicate fails with [`crate::domain::ErrorCode::Locked`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceLocationCommand: Send + Sync {
    /// Register a new service location for the draft's customer.
    async fn add(&self, draft: ServiceLocationDraft) -> Result<ServiceLocationId, Error>;

    /// Change the address or occupancy of an owned service location.
    async fn update(&self, update: ServiceLocationUpdate) -> Result<(), Error>;

    /// Soft-delete an owned service location.
    async fn delete(&self, customer: CustomerId, id: ServiceLocationId) -> Result<(), Error>;
}

/// Service location reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceLocationQuery: Send + Sync {
    /// Every service location the customer holds.
    async fn list(&self, customer: CustomerId) -> Result<Vec<ServiceLocation>, Error>;
}
