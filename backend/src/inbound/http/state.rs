//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, DashboardQuery, EnrolledDeviceCommand, EnrolledDeviceQuery,
    ServiceLocationCommand, ServiceLocationQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub service_locations: Arc<dyn ServiceLocationCommand>,
    pub service_locations_query: Arc<dyn ServiceLocationQuery>,
    pub enrolled_devices: Arc<dyn EnrolledDeviceCommand>,
    pub enrolled_devices_query: Arc<dyn EnrolledDeviceQuery>,
}
