//! Builders shared by the service-level integration tests.

use chrono::{NaiveDate, NaiveDateTime};
use shems::domain::{
    Address, CustomerProfile, CustomerRegistration, LocationDetails, LoginCredentials,
    ServiceLocationDraft, CustomerId,
};

pub fn address(street: i32) -> Address {
    Address {
        unit_number: 1,
        street,
        city: "Springfield".to_owned(),
        state: "IL".to_owned(),
        zipcode: 62_701,
        country: "USA".to_owned(),
    }
}

pub fn details(street: i32, square_footage: f32) -> LocationDetails {
    LocationDetails {
        address: address(street),
        square_footage,
        bedrooms_count: 3,
    }
}

pub fn registration(email: &str, street: i32) -> CustomerRegistration {
    CustomerRegistration::try_new(
        CustomerProfile {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone_number: "555-0100".to_owned(),
        },
        email,
        "correct horse",
        details(street, 1200.0),
    )
    .expect("valid registration")
}

pub fn credentials(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, password).expect("valid credentials")
}

pub fn draft(customer: CustomerId, street: i32, square_footage: f32) -> ServiceLocationDraft {
    ServiceLocationDraft {
        customer_id: customer,
        date_taken_over: NaiveDate::from_ymd_opt(2023, 6, 1).expect("date"),
        occupants_count: 2,
        details: details(street, square_footage),
    }
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, day)
        .and_then(|date| date.and_hms_opt(hour, 15, 0))
        .expect("timestamp")
}
