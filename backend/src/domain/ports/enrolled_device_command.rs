//! Driving ports for managing enrolled devices.

use async_trait::async_trait;

use crate::domain::{
    CustomerId, EnrolledDeviceDraft, EnrolledDeviceId, EnrolledDeviceOverview,
    EnrolledDeviceUpdate, Error,
};

/// Mutating enrolled device use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrolledDeviceCommand: Send + Sync {
    /// Enroll a catalog device at one of the customer's service locations.
    async fn add(&self, draft: EnrolledDeviceDraft) -> Result<EnrolledDeviceId, Error>;

    /// Move or rename an owned enrolled device.
    async fn update(&self, update: EnrolledDeviceUpdate) -> Result<(), Error>;

    /// Soft-delete an owned enrolled device.
    async fn delete(&self, customer: CustomerId, id: EnrolledDeviceId) -> Result<(), Error>;
}

/// Enrolled device reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrolledDeviceQuery: Send + Sync {
    /// Enrolled devices with labels, the catalog, and the customer's locations.
    async fn overview(&self, customer: CustomerId) -> Result<EnrolledDeviceOverview, Error>;
}
