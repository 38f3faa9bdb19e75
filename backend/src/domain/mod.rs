//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed entities for customers, locations, devices
//! and energy usage, plus the services that enforce ownership, uniqueness and
//! the per-customer advisory lock. Nothing here knows about HTTP, Diesel or
//! Redis; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - Identifier newtypes (`CustomerId`, `ServiceLocationId`, ...).
//! - Services: [`AccountService`], [`DashboardService`],
//!   [`ServiceLocationService`], [`EnrolledDeviceService`].

pub mod advisory_lock;
pub mod billing_period;
pub mod customer;
pub mod dashboard;
pub mod device;
pub mod error;
pub mod ids;
pub mod location;
pub mod ports;
pub mod trace_id;

mod account_service;
mod dashboard_service;
mod enrolled_device_service;
mod location_resolution;
mod service_location_service;

pub use self::account_service::AccountService;
pub use self::advisory_lock::{
    AdvisoryLock, DEFAULT_LOCK_TTL, HELD_FLAG, LockError, LockGuard, LockKey, LockedOperation,
};
pub use self::billing_period::{BILLING_DATE_FORMAT, BillingPeriod, BillingPeriodError};
pub use self::customer::{
    AccountValidationError, Customer, CustomerProfile, CustomerRegistration, LoginCredentials,
    NewCustomer, StoredCustomer,
};
pub use self::dashboard::{
    DashboardInputs, DashboardReport, DeviceConsumption, DeviceUsage, ENERGY_USE_LABEL,
    HourlyPrice, LocationFootprint, LocationHourlyUsage, PEER_TOLERANCE, PeerBenchmark,
    PriceTable, ServiceLocationCost,
};
pub use self::dashboard_service::DashboardService;
pub use self::device::{
    CatalogDevice, Device, EnrolledDevice, EnrolledDeviceDraft, EnrolledDeviceOverview,
    EnrolledDeviceUpdate, EnrolledDeviceView,
};
pub use self::enrolled_device_service::EnrolledDeviceService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{
    CustomerId, DeviceId, EnrolledDeviceId, EntityId, IdValidationError, LocationId,
    ServiceLocationId,
};
pub use self::location::{
    Address, LocationDetails, ServiceLocation, ServiceLocationDraft, ServiceLocationInsert,
    ServiceLocationUpdate,
};
pub use self::service_location_service::ServiceLocationService;
pub use self::trace_id::TraceId;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
