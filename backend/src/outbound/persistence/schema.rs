//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Physical addresses. The address tuple is unique (`locations_address_key`).
    locations (id) {
        id -> Int4,
        unit_number -> Int4,
        street -> Int4,
        city -> Text,
        state -> Text,
        zipcode -> Int4,
        country -> Text,
        square_footage -> Float4,
        bedrooms_count -> Int4,
    }
}

diesel::table! {
    /// Registered customers. `email` is unique (`customers_email_key`).
    customers (id) {
        id -> Int4,
        first_name -> Text,
        last_name -> Text,
        phone_number -> Text,
        email -> Text,
        billing_address_id -> Int4,
        /// Argon2 PHC string.
        password_hash -> Text,
    }
}

diesel::table! {
    service_locations (id) {
        id -> Int4,
        customer_id -> Int4,
        location_id -> Int4,
        date_taken_over -> Date,
        occupants_count -> Int4,
        active -> Bool,
    }
}

diesel::table! {
    /// Device catalog; reference data only.
    devices (id) {
        id -> Int4,
        device_type -> Text,
        model_number -> Text,
    }
}

diesel::table! {
    enrolled_devices (id) {
        id -> Int4,
        service_location_id -> Int4,
        device_id -> Int4,
        alias_name -> Text,
        room_number -> Int4,
        active -> Bool,
    }
}

diesel::table! {
    /// Device telemetry. Only rows labelled `energy use` count as consumption.
    events (id) {
        id -> Int8,
        enrolled_device_id -> Int4,
        label -> Text,
        value -> Float4,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Tariff per zipcode and hour of day (1..=24).
    prices (zipcode, hour) {
        zipcode -> Int4,
        hour -> Int4,
        value -> Float4,
    }
}

diesel::joinable!(customers -> locations (billing_address_id));
diesel::joinable!(service_locations -> customers (customer_id));
diesel::joinable!(service_locations -> locations (location_id));
diesel::joinable!(enrolled_devices -> service_locations (service_location_id));
diesel::joinable!(enrolled_devices -> devices (device_id));
diesel::joinable!(events -> enrolled_devices (enrolled_device_id));

diesel::allow_tables_to_appear_in_same_query!(
    locations,
    customers,
    service_locations,
    devices,
    enrolled_devices,
    events,
    prices,
);
