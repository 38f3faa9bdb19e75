//! Enrolled device management gated by ownership and the advisory lock.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::ports::{
    DeviceCatalog, EnrolledDeviceCommand, EnrolledDeviceQuery, EnrolledDeviceRepository,
    ServiceLocationRepository,
};
use super::{
    AdvisoryLock, CustomerId, EnrolledDeviceDraft, EnrolledDeviceId, EnrolledDeviceOverview,
    EnrolledDeviceUpdate, Error, LockedOperation, ServiceLocationId,
};

fn service_location_missing(id: ServiceLocationId) -> Error {
    Error::not_found("Service Location does not exist")
        .with_details(json!({ "serviceLocationId": id }))
}

fn enrolled_device_missing(id: EnrolledDeviceId) -> Error {
    Error::not_found("Enrolled Device does not exist")
        .with_details(json!({ "enrolledDeviceId": id }))
}

/// Enrolled device use-cases.
#[derive(Clone)]
pub struct EnrolledDeviceService<E, S, D> {
    enrolled: Arc<E>,
    service_locations: Arc<S>,
    catalog: Arc<D>,
    lock: AdvisoryLock,
}

impl<E, S, D> EnrolledDeviceService<E, S, D> {
    /// Create the service.
    pub fn new(
        enrolled: Arc<E>,
        service_locations: Arc<S>,
        catalog: Arc<D>,
        lock: AdvisoryLock,
    ) -> Self {
        Self {
            enrolled,
            service_locations,
            catalog,
            lock,
        }
    }
}

impl<E, S, D> EnrolledDeviceService<E, S, D>
where
    E: EnrolledDeviceRepository,
    S: ServiceLocationRepository,
    D: DeviceCatalog,
{
    async fn ensure_service_location(
        &self,
        id: ServiceLocationId,
        customer: CustomerId,
    ) -> Result<(), Error> {
        if self.service_locations.is_owned_by(id, customer).await? {
            Ok(())
        } else {
            Err(service_location_missing(id))
        }
    }

    async fn insert_owned(&self, draft: &EnrolledDeviceDraft) -> Result<EnrolledDeviceId, Error> {
        self.ensure_service_location(draft.service_location_id, draft.customer_id)
            .await?;
        Ok(self.enrolled.insert(draft).await?)
    }

    async fn update_owned(&self, update: &EnrolledDeviceUpdate) -> Result<(), Error> {
        let customer = update.draft.customer_id;
        if !self.enrolled.is_owned_by(update.id, customer).await? {
            return Err(enrolled_device_missing(update.id));
        }
        self.ensure_service_location(update.draft.service_location_id, customer)
            .await?;
        self.enrolled.update(update).await?;
        Ok(())
    }
}

#[async_trait]
impl<E, S, D> EnrolledDeviceCommand for EnrolledDeviceService<E, S, D>
where
    E: EnrolledDeviceRepository,
    S: ServiceLocationRepository,
    D: DeviceCatalog,
{
    async fn add(&self, draft: EnrolledDeviceDraft) -> Result<EnrolledDeviceId, Error> {
        let guard = self
            .lock
            .acquire(LockedOperation::AddEnrolledDevice, draft.customer_id)
            .await?;
        let outcome = self.insert_owned(&draft).await;
        guard.release().await;

        let id = outcome?;
        info!(
            customer = %draft.customer_id,
            enrolled_device_id = %id,
            "device enrolled"
        );
        Ok(id)
    }

    async fn update(&self, update: EnrolledDeviceUpdate) -> Result<(), Error> {
        let guard = self
            .lock
            .acquire(
                LockedOperation::UpdateEnrolledDevice,
                update.draft.customer_id,
            )
            .await?;
        let outcome = self.update_owned(&update).await;
        guard.release().await;

        outcome?;
        info!(enrolled_device_id = %update.id, "enrolled device updated");
        Ok(())
    }

    async fn delete(&self, customer: CustomerId, id: EnrolledDeviceId) -> Result<(), Error> {
        if !self.enrolled.is_owned_by(id, customer).await? {
            return Err(enrolled_device_missing(id));
        }
        self.enrolled.deactivate(id).await?;
        info!(%customer, enrolled_device_id = %id, "enrolled device deactivated");
        Ok(())
    }
}

#[async_trait]
impl<E, S, D> EnrolledDeviceQuery for EnrolledDeviceService<E, S, D>
where
    E: EnrolledDeviceRepository,
    S: ServiceLocationRepository,
    D: DeviceCatalog,
{
    async fn overview(&self, customer: CustomerId) -> Result<EnrolledDeviceOverview, Error> {
        let (enrolled, devices, service_locations) = futures_util::try_join!(
            self.enrolled.list_for_customer(customer),
            self.catalog.list_devices(),
            self.service_locations.list_for_customer(customer),
        )?;
        Ok(EnrolledDeviceOverview::assemble(
            enrolled,
            devices,
            service_locations,
        ))
    }
}
