//! HTTP inbound adapter exposing the dashboard REST endpoints.

pub mod accounts;
pub mod dashboard;
pub mod enrolled_devices;
pub mod error;
pub mod health;
pub mod service_locations;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
