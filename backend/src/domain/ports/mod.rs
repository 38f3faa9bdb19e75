//! Domain ports: the traits adapters implement (driven) or call (driving).
//!
//! Driven ports return typed errors generated by `define_port_error!`;
//! services translate them into [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod credential_hasher;
mod customer_repository;
mod dashboard_query;
mod energy_usage_repository;
mod enrolled_device_command;
mod enrolled_device_repository;
mod location_repository;
mod lock_store;
mod service_location_command;
mod service_location_repository;
mod store_error;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use customer_repository::CustomerRepository;
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use energy_usage_repository::EnergyUsageRepository;
#[cfg(test)]
pub use energy_usage_repository::MockEnergyUsageRepository;
pub use enrolled_device_command::{EnrolledDeviceCommand, EnrolledDeviceQuery};
#[cfg(test)]
pub use enrolled_device_command::{MockEnrolledDeviceCommand, MockEnrolledDeviceQuery};
pub use enrolled_device_repository::{DeviceCatalog, EnrolledDeviceRepository};
#[cfg(test)]
pub use enrolled_device_repository::{MockDeviceCatalog, MockEnrolledDeviceRepository};
pub use location_repository::LocationRepository;
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use lock_store::{LockStore, LockStoreError};
#[cfg(test)]
pub use lock_store::MockLockStore;
pub use service_location_command::{ServiceLocationCommand, ServiceLocationQuery};
#[cfg(test)]
pub use service_location_command::{MockServiceLocationCommand, MockServiceLocationQuery};
pub use service_location_repository::{ServiceLocationChange, ServiceLocationRepository};
#[cfg(test)]
pub use service_location_repository::MockServiceLocationRepository;
pub use store_error::StoreError;
