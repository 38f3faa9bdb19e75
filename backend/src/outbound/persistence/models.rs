//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next
//! to the rows so every repository shares them.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{Float4, Int4, Nullable, Text};

use crate::domain::{
    Address, Customer, CustomerId, Device, DeviceId, DeviceUsage, EnrolledDevice,
    EnrolledDeviceId, HourlyPrice, IdValidationError, LocationDetails, LocationFootprint,
    LocationHourlyUsage, LocationId, ServiceLocation, ServiceLocationId, StoredCustomer,
};

use super::schema::{customers, devices, enrolled_devices, locations, prices, service_locations};

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LocationRow {
    pub id: i32,
    pub unit_number: i32,
    pub street: i32,
    pub city: String,
    pub state: String,
    pub zipcode: i32,
    pub country: String,
    pub square_footage: f32,
    pub bedrooms_count: i32,
}

impl LocationRow {
    pub(crate) fn into_details(self) -> LocationDetails {
        LocationDetails {
            address: Address {
                unit_number: self.unit_number,
                street: self.street,
                city: self.city,
                state: self.state,
                zipcode: self.zipcode,
                country: self.country,
            },
            square_footage: self.square_footage,
            bedrooms_count: self.bedrooms_count,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = locations)]
pub(crate) struct NewLocationRow<'a> {
    pub unit_number: i32,
    pub street: i32,
    pub city: &'a str,
    pub state: &'a str,
    pub zipcode: i32,
    pub country: &'a str,
    pub square_footage: f32,
    pub bedrooms_count: i32,
}

impl<'a> From<&'a LocationDetails> for NewLocationRow<'a> {
    fn from(details: &'a LocationDetails) -> Self {
        Self {
            unit_number: details.address.unit_number,
            street: details.address.street,
            city: &details.address.city,
            state: &details.address.state,
            zipcode: details.address.zipcode,
            country: &details.address.country,
            square_footage: details.square_footage,
            bedrooms_count: details.bedrooms_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub billing_address_id: i32,
    pub password_hash: String,
}

impl TryFrom<CustomerRow> for StoredCustomer {
    type Error = IdValidationError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            customer: Customer {
                id: CustomerId::new(row.id)?,
                first_name: row.first_name,
                last_name: row.last_name,
                phone_number: row.phone_number,
                email: row.email,
                billing_address_id: LocationId::new(row.billing_address_id)?,
            },
            password_hash: row.password_hash,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: &'a str,
    pub email: &'a str,
    pub billing_address_id: i32,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Service locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = service_locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceLocationRow {
    pub id: i32,
    pub customer_id: i32,
    pub location_id: i32,
    pub date_taken_over: NaiveDate,
    pub occupants_count: i32,
    pub active: bool,
}

impl ServiceLocationRow {
    pub(crate) fn with_location(
        self,
        location: LocationRow,
    ) -> Result<ServiceLocation, IdValidationError> {
        Ok(ServiceLocation {
            id: ServiceLocationId::new(self.id)?,
            customer_id: CustomerId::new(self.customer_id)?,
            location_id: LocationId::new(self.location_id)?,
            date_taken_over: self.date_taken_over,
            occupants_count: self.occupants_count,
            details: location.into_details(),
            active: self.active,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = service_locations)]
pub(crate) struct NewServiceLocationRow {
    pub customer_id: i32,
    pub location_id: i32,
    pub date_taken_over: NaiveDate,
    pub occupants_count: i32,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = service_locations)]
pub(crate) struct ServiceLocationChangeset {
    pub location_id: i32,
    pub date_taken_over: NaiveDate,
    pub occupants_count: i32,
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = devices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeviceRow {
    pub id: i32,
    pub device_type: String,
    pub model_number: String,
}

impl TryFrom<DeviceRow> for Device {
    type Error = IdValidationError;

    fn try_from(row: DeviceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DeviceId::new(row.id)?,
            device_type: row.device_type,
            model_number: row.model_number,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrolled_devices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrolledDeviceRow {
    pub id: i32,
    pub service_location_id: i32,
    pub device_id: i32,
    pub alias_name: String,
    pub room_number: i32,
    pub active: bool,
}

impl TryFrom<EnrolledDeviceRow> for EnrolledDevice {
    type Error = IdValidationError;

    fn try_from(row: EnrolledDeviceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EnrolledDeviceId::new(row.id)?,
            service_location_id: ServiceLocationId::new(row.service_location_id)?,
            device_id: DeviceId::new(row.device_id)?,
            alias_name: row.alias_name,
            room_number: row.room_number,
            active: row.active,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = enrolled_devices)]
pub(crate) struct EnrolledDeviceValues<'a> {
    pub service_location_id: i32,
    pub device_id: i32,
    pub alias_name: &'a str,
    pub room_number: i32,
}

// ---------------------------------------------------------------------------
// Prices and usage aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = prices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PriceRow {
    pub zipcode: i32,
    pub hour: i32,
    pub value: f32,
}

impl From<PriceRow> for HourlyPrice {
    fn from(row: PriceRow) -> Self {
        Self {
            zipcode: row.zipcode,
            hour: row.hour,
            value: row.value,
        }
    }
}

/// One row of the per-location, per-hour consumption aggregate.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct LocationUsageRow {
    #[diesel(sql_type = Int4)]
    pub location_id: i32,
    #[diesel(sql_type = Int4)]
    pub unit_number: i32,
    #[diesel(sql_type = Int4)]
    pub street: i32,
    #[diesel(sql_type = Text)]
    pub city: String,
    #[diesel(sql_type = Text)]
    pub state: String,
    #[diesel(sql_type = Int4)]
    pub zipcode: i32,
    #[diesel(sql_type = Text)]
    pub country: String,
    #[diesel(sql_type = Nullable<Int4>)]
    pub hour_of_day: Option<i32>,
    #[diesel(sql_type = Float4)]
    pub consumption: f32,
}

impl TryFrom<LocationUsageRow> for LocationHourlyUsage {
    type Error = IdValidationError;

    fn try_from(row: LocationUsageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            location_id: LocationId::new(row.location_id)?,
            address: Address {
                unit_number: row.unit_number,
                street: row.street,
                city: row.city,
                state: row.state,
                zipcode: row.zipcode,
                country: row.country,
            },
            hour_of_day: row.hour_of_day,
            consumption: row.consumption,
        })
    }
}

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct FootprintRow {
    #[diesel(sql_type = Int4)]
    pub location_id: i32,
    #[diesel(sql_type = Float4)]
    pub square_footage: f32,
    #[diesel(sql_type = Float4)]
    pub consumption: f32,
}

impl TryFrom<FootprintRow> for LocationFootprint {
    type Error = IdValidationError;

    fn try_from(row: FootprintRow) -> Result<Self, Self::Error> {
        Ok(Self {
            location_id: LocationId::new(row.location_id)?,
            square_footage: row.square_footage,
            consumption: row.consumption,
        })
    }
}

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct DeviceUsageRow {
    #[diesel(sql_type = Int4)]
    pub enrolled_device_id: i32,
    #[diesel(sql_type = Text)]
    pub alias_name: String,
    #[diesel(sql_type = Text)]
    pub device_type: String,
    #[diesel(sql_type = Text)]
    pub model_number: String,
    #[diesel(sql_type = Float4)]
    pub consumption: f32,
}

impl TryFrom<DeviceUsageRow> for DeviceUsage {
    type Error = IdValidationError;

    fn try_from(row: DeviceUsageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            enrolled_device_id: EnrolledDeviceId::new(row.enrolled_device_id)?,
            alias_name: row.alias_name,
            device_type: row.device_type,
            model_number: row.model_number,
            consumption: row.consumption,
        })
    }
}
