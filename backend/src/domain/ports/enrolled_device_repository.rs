//! Ports for enrolled devices and the device catalog.

use async_trait::async_trait;

use crate::domain::{
    CustomerId, Device, EnrolledDevice, EnrolledDeviceDraft, EnrolledDeviceId,
    EnrolledDeviceUpdate,
};

use super::StoreError;

/// Enrolled device storage.
///
/// Reads do not filter on the active flag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrolledDeviceRepository: Send + Sync {
    /// Devices enrolled at any of the customer's service locations.
    async fn list_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<EnrolledDevice>, StoreError>;

    /// Whether `id` exists at a service location owned by `customer`.
    async fn is_owned_by(
        &self,
        id: EnrolledDeviceId,
        customer: CustomerId,
    ) -> Result<bool, StoreError>;

    /// Enroll a device.
    async fn insert(&self, draft: &EnrolledDeviceDraft) -> Result<EnrolledDeviceId, StoreError>;

    /// Move or rename an enrolled device.
    async fn update(&self, update: &EnrolledDeviceUpdate) -> Result<(), StoreError>;

    /// Clear the active flag.
    async fn deactivate(&self, id: EnrolledDeviceId) -> Result<(), StoreError>;
}

/// Read-only device catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceCatalog: Send + Sync {
    /// Every catalog device ordered by id.
    async fn list_devices(&self) -> Result<Vec<Device>, StoreError>;
}
