//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockAccountCommand, MockDashboardQuery, MockEnrolledDeviceCommand, MockEnrolledDeviceQuery,
    MockServiceLocationCommand, MockServiceLocationQuery,
};
use crate::inbound::http::state::HttpState;

/// One mock per driving port. Tests set expectations on the ports they
/// exercise; untouched mocks panic if a handler reaches them.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub dashboard: MockDashboardQuery,
    pub service_locations: MockServiceLocationCommand,
    pub service_locations_query: MockServiceLocationQuery,
    pub enrolled_devices: MockEnrolledDeviceCommand,
    pub enrolled_devices_query: MockEnrolledDeviceQuery,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            dashboard: Arc::new(self.dashboard),
            service_locations: Arc::new(self.service_locations),
            service_locations_query: Arc::new(self.service_locations_query),
            enrolled_devices: Arc::new(self.enrolled_devices),
            enrolled_devices_query: Arc::new(self.enrolled_devices_query),
        })
    }
}
