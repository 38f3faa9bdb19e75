//! Service location management gated by ownership and the advisory lock.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::location_resolution::resolve_location;
use super::ports::{
    LocationRepository, ServiceLocationChange, ServiceLocationCommand, ServiceLocationQuery,
    ServiceLocationRepository,
};
use super::{
    AdvisoryLock, CustomerId, Error, LockedOperation, ServiceLocation, ServiceLocationDraft,
    ServiceLocationId, ServiceLocationInsert, ServiceLocationUpdate,
};

/// Service location use-cases.
#[derive(Clone)]
pub struct ServiceLocationService<S, L> {
    service_locations: Arc<S>,
    locations: Arc<L>,
    lock: AdvisoryLock,
}

impl<S, L> ServiceLocationService<S, L> {
    /// Create the service.
    pub fn new(service_locations: Arc<S>, locations: Arc<L>, lock: AdvisoryLock) -> Self {
        Self {
            service_locations,
            locations,
            lock,
        }
    }
}

impl<S, L> ServiceLocationService<S, L>
where
    S: ServiceLocationRepository,
    L: LocationRepository,
{
    async fn apply_update(&self, update: &ServiceLocationUpdate) -> Result<(), Error> {
        let customer = update.draft.customer_id;
        if !self
            .service_locations
            .is_owned_by(update.id, customer)
            .await?
        {
            return Err(Error::not_found("Service location does not exist")
                .with_details(json!({ "serviceLocationId": update.id })));
        }

        let location_id = resolve_location(self.locations.as_ref(), &update.draft.details).await?;
        let clash = self
            .service_locations
            .find_at_location(customer, location_id)
            .await?;
        if clash.is_some_and(|existing| existing != update.id) {
            return Err(Error::conflict(
                "Service Location with same address already exists",
            ));
        }

        self.service_locations
            .update(&ServiceLocationChange {
                id: update.id,
                location_id,
                date_taken_over: update.draft.date_taken_over,
                occupants_count: update.draft.occupants_count,
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<S, L> ServiceLocationCommand for ServiceLocationService<S, L>
where
    S: ServiceLocationRepository,
    L: LocationRepository,
{
    async fn add(&self, draft: ServiceLocationDraft) -> Result<ServiceLocationId, Error> {
        let customer = draft.customer_id;
        let guard = self
            .lock
            .acquire(LockedOperation::AddServiceLocation, customer)
            .await?;
        let outcome = self.service_locations.insert_unique(&draft).await;
        guard.release().await;

        match outcome? {
            ServiceLocationInsert::Created(id) => {
                info!(%customer, service_location_id = %id, "service location added");
                Ok(id)
            }
            ServiceLocationInsert::AlreadyExists(id) => Err(Error::conflict(
                "Service Location already exists",
            )
            .with_details(json!({ "serviceLocationId": id }))),
        }
    }

    async fn update(&self, update: ServiceLocationUpdate) -> Result<(), Error> {
        let guard = self
            .lock
            .acquire(
                LockedOperation::UpdateServiceLocation,
                update.draft.customer_id,
            )
            .await?;
        let outcome = self.apply_update(&update).await;
        guard.release().await;

        if outcome.is_ok() {
            info!(service_location_id = %update.id, "service location updated");
        }
        outcome
    }

    async fn delete(&self, customer: CustomerId, id: ServiceLocationId) -> Result<(), Error> {
        if !self.service_locations.is_owned_by(id, customer).await? {
            return Err(Error::not_found("Service Location does not exist")
                .with_details(json!({ "serviceLocationId": id })));
        }
        self.service_locations.deactivate(id).await?;
        info!(%customer, service_location_id = %id, "service location deactivated");
        Ok(())
    }
}

#[async_trait]
impl<S, L> ServiceLocationQuery for ServiceLocationService<S, L>
where
    S: ServiceLocationRepository,
    L: LocationRepository,
{
    async fn list(&self, customer: CustomerId) -> Result<Vec<ServiceLocation>, Error> {
        Ok(self.service_locations.list_for_customer(customer).await?)
    }
}
