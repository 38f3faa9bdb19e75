//! Wiring of outbound adapters into domain services and HTTP state.

use std::sync::Arc;
use std::time::Duration;

use shems::domain::ports::{
    AccountCommand, DashboardQuery, EnrolledDeviceCommand, EnrolledDeviceQuery, LockStore,
    ServiceLocationCommand, ServiceLocationQuery,
};
use shems::domain::{
    AccountService, AdvisoryLock, DashboardService, EnrolledDeviceService, ServiceLocationService,
};
use shems::inbound::http::state::HttpState;
use shems::outbound::crypto::Argon2CredentialHasher;
use shems::outbound::persistence::{
    DbPool, DieselCustomerRepository, DieselEnergyUsageRepository, DieselEnrolledDeviceRepository,
    DieselLocationRepository, DieselServiceLocationRepository,
};

/// Adapters shared by every service.
pub struct Adapters {
    pub pool: DbPool,
    pub lock_store: Arc<dyn LockStore>,
    pub lock_ttl: Duration,
    pub hasher: Argon2CredentialHasher,
}

/// Build the HTTP state from database-backed repositories.
pub fn build_http_state(adapters: Adapters) -> HttpState {
    let Adapters {
        pool,
        lock_store,
        lock_ttl,
        hasher,
    } = adapters;

    let customers = Arc::new(DieselCustomerRepository::new(pool.clone()));
    let locations = Arc::new(DieselLocationRepository::new(pool.clone()));
    let service_locations = Arc::new(DieselServiceLocationRepository::new(pool.clone()));
    let enrolled = Arc::new(DieselEnrolledDeviceRepository::new(pool.clone()));
    let usage = Arc::new(DieselEnergyUsageRepository::new(pool));
    let lock = AdvisoryLock::new(lock_store, lock_ttl);

    let accounts: Arc<dyn AccountCommand> = Arc::new(AccountService::new(
        customers,
        locations.clone(),
        Arc::new(hasher),
    ));
    let dashboard: Arc<dyn DashboardQuery> = Arc::new(DashboardService::new(usage));
    let location_service = Arc::new(ServiceLocationService::new(
        service_locations.clone(),
        locations,
        lock.clone(),
    ));
    let device_service = Arc::new(EnrolledDeviceService::new(
        enrolled.clone(),
        service_locations,
        enrolled,
        lock,
    ));

    HttpState {
        accounts,
        dashboard,
        service_locations: location_service.clone() as Arc<dyn ServiceLocationCommand>,
        service_locations_query: location_service as Arc<dyn ServiceLocationQuery>,
        enrolled_devices: device_service.clone() as Arc<dyn EnrolledDeviceCommand>,
        enrolled_devices_query: device_service as Arc<dyn EnrolledDeviceQuery>,
    }
}
