//! Physical locations and the service locations customers hold at them.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::ids::{CustomerId, LocationId, ServiceLocationId};

/// Postal address. The full tuple is the deduplication key for locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub unit_number: i32,
    pub street: i32,
    pub city: String,
    pub state: String,
    pub zipcode: i32,
    pub country: String,
}

impl std::fmt::Display for Address {
    /// Renders `unit, street, city, state, zipcode, country`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            self.unit_number, self.street, self.city, self.state, self.zipcode, self.country
        )
    }
}

/// Address plus the dwelling attributes stored with a location.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetails {
    #[serde(flatten)]
    pub address: Address,
    pub square_footage: f32,
    pub bedrooms_count: i32,
}

/// A customer's association with a location.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    pub id: ServiceLocationId,
    pub customer_id: CustomerId,
    pub location_id: LocationId,
    pub date_taken_over: NaiveDate,
    pub occupants_count: i32,
    #[serde(flatten)]
    pub details: LocationDetails,
    pub active: bool,
}

impl ServiceLocation {
    /// Display label shown next to devices in the dashboard.
    #[must_use]
    pub fn label(&self) -> String {
        self.details.address.to_string()
    }
}

/// Input for creating a service location.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLocationDraft {
    pub customer_id: CustomerId,
    pub date_taken_over: NaiveDate,
    pub occupants_count: i32,
    pub details: LocationDetails,
}

/// Input for updating an existing service location.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLocationUpdate {
    pub id: ServiceLocationId,
    pub draft: ServiceLocationDraft,
}

/// Outcome of the atomic add performed by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLocationInsert {
    /// A new row was written.
    Created(ServiceLocationId),
    /// The customer already holds a service location at the address.
    AlreadyExists(ServiceLocationId),
}
