//! Dashboard read model assembled from the energy usage repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{DashboardQuery, EnergyUsageRepository};
use super::{BillingPeriod, CustomerId, DashboardInputs, DashboardReport, Error};

/// Dashboard service; no caching, every call reads the store.
#[derive(Clone)]
pub struct DashboardService<R> {
    usage: Arc<R>,
}

impl<R> DashboardService<R> {
    /// Create the service.
    pub fn new(usage: Arc<R>) -> Self {
        Self { usage }
    }
}

#[async_trait]
impl<R> DashboardQuery for DashboardService<R>
where
    R: EnergyUsageRepository,
{
    async fn dashboard(
        &self,
        customer: CustomerId,
        period: BillingPeriod,
    ) -> Result<DashboardReport, Error> {
        let (location_usage, footprints, prices, device_usage) = futures_util::try_join!(
            self.usage.location_usage(customer, &period),
            self.usage.location_footprints(&period),
            self.usage.hourly_prices(),
            self.usage.device_usage(customer, &period),
        )?;
        debug!(
            %customer,
            usage_rows = location_usage.len(),
            locations = footprints.len(),
            devices = device_usage.len(),
            "dashboard inputs loaded"
        );
        Ok(DashboardReport::assemble(DashboardInputs {
            location_usage,
            footprints,
            prices,
            device_usage,
        }))
    }
}
