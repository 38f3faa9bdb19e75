//! Driving port for the energy dashboard.

use async_trait::async_trait;

use crate::domain::{BillingPeriod, CustomerId, DashboardReport, Error};

/// Read-only dashboard use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Build the customer's report for one billing period.
    async fn dashboard(
        &self,
        customer: CustomerId,
        period: BillingPeriod,
    ) -> Result<DashboardReport, Error>;
}
