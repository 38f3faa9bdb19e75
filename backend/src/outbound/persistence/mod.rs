//! PostgreSQL persistence adapters using Diesel.
//!
//! Concrete implementations of the relational ports backed by PostgreSQL via
//! `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between rows and domain types;
//!   ownership and uniqueness rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: every Diesel or pool failure becomes a `StoreError`.
//!
//! ```ignore
//! use shems::outbound::persistence::{DbPool, DieselCustomerRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shems")).await?;
//! let customers = DieselCustomerRepository::new(pool);
//! ```

mod diesel_customer_repository;
mod diesel_energy_usage_repository;
mod diesel_enrolled_device_repository;
mod diesel_helpers;
mod diesel_location_repository;
mod diesel_service_location_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_energy_usage_repository::DieselEnergyUsageRepository;
pub use diesel_enrolled_device_repository::DieselEnrolledDeviceRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_service_location_repository::DieselServiceLocationRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
