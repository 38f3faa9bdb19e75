//! Port for the telemetry and pricing reads behind the dashboard.

use async_trait::async_trait;

use crate::domain::{
    BillingPeriod, CustomerId, DeviceUsage, HourlyPrice, LocationFootprint, LocationHourlyUsage,
};

use super::StoreError;

/// Aggregate reads over `energy use` events.
///
/// Every method sums event values inside the inclusive billing window.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnergyUsageRepository: Send + Sync {
    /// Usage per (location, hour of day) for each of the customer's
    /// service locations. Locations without events yield one row with no hour.
    async fn location_usage(
        &self,
        customer: CustomerId,
        period: &BillingPeriod,
    ) -> Result<Vec<LocationHourlyUsage>, StoreError>;

    /// Square footage and total usage of every location in the system.
    async fn location_footprints(
        &self,
        period: &BillingPeriod,
    ) -> Result<Vec<LocationFootprint>, StoreError>;

    /// The full price table ordered by zipcode, then hour.
    async fn hourly_prices(&self) -> Result<Vec<HourlyPrice>, StoreError>;

    /// Usage per enrolled device for the customer's devices.
    async fn device_usage(
        &self,
        customer: CustomerId,
        period: &BillingPeriod,
    ) -> Result<Vec<DeviceUsage>, StoreError>;
}
