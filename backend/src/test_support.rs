//! In-memory adapters for service-level and end-to-end tests.
//!
//! [`InMemoryStore`] implements every relational port over one set of tables
//! so services wired against it observe each other's writes, the same way
//! they would against PostgreSQL. Reads mirror the SQL adapters: active flags
//! are ignored and energy sums use an inclusive billing window.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use tokio::sync::Mutex;

use crate::domain::ports::{
    CredentialHashError, CredentialHasher, CustomerRepository, DeviceCatalog,
    EnergyUsageRepository, EnrolledDeviceRepository, LocationRepository, ServiceLocationChange,
    ServiceLocationRepository, StoreError,
};
use crate::domain::{
    AccountService, Address, AdvisoryLock, BillingPeriod, Customer, CustomerId, DashboardService,
    Device, DeviceId, DeviceUsage, ENERGY_USE_LABEL, EnrolledDevice, EnrolledDeviceDraft,
    EnrolledDeviceId, EnrolledDeviceService, EnrolledDeviceUpdate, HourlyPrice,
    LocationDetails, LocationFootprint, LocationHourlyUsage, LocationId, NewCustomer,
    ServiceLocation, ServiceLocationDraft, ServiceLocationId, ServiceLocationInsert,
    ServiceLocationService, StoredCustomer,
};
use crate::inbound::http::state::HttpState;

pub use crate::outbound::lock::InMemoryLockStore;

#[derive(Debug, Clone)]
struct ServiceLocationRecord {
    id: ServiceLocationId,
    customer_id: CustomerId,
    location_id: LocationId,
    date_taken_over: chrono::NaiveDate,
    occupants_count: i32,
    active: bool,
}

#[derive(Debug, Clone)]
struct EventRecord {
    enrolled_device_id: EnrolledDeviceId,
    label: String,
    value: f32,
    created_at: NaiveDateTime,
}

#[derive(Debug, Default)]
struct Tables {
    locations: Vec<(LocationId, LocationDetails)>,
    customers: Vec<StoredCustomer>,
    service_locations: Vec<ServiceLocationRecord>,
    devices: Vec<Device>,
    enrolled: Vec<EnrolledDevice>,
    events: Vec<EventRecord>,
    prices: Vec<HourlyPrice>,
}

fn next_id(len: usize) -> Result<i32, StoreError> {
    i32::try_from(len + 1).map_err(|_| StoreError::query("id sequence exhausted"))
}

fn row_error(err: crate::domain::IdValidationError) -> StoreError {
    StoreError::query(format!("invalid stored row: {err}"))
}

impl Tables {
    fn location_by_address(&self, address: &Address) -> Option<LocationId> {
        self.locations
            .iter()
            .find(|(_, details)| &details.address == address)
            .map(|(id, _)| *id)
    }

    fn insert_location(&mut self, details: &LocationDetails) -> Result<LocationId, StoreError> {
        if self.location_by_address(&details.address).is_some() {
            return Err(StoreError::duplicate("locations_address_key"));
        }
        let id = LocationId::new(next_id(self.locations.len())?).map_err(row_error)?;
        self.locations.push((id, details.clone()));
        Ok(id)
    }

    fn details(&self, id: LocationId) -> Result<&LocationDetails, StoreError> {
        self.locations
            .iter()
            .find(|(location_id, _)| *location_id == id)
            .map(|(_, details)| details)
            .ok_or_else(|| StoreError::query(format!("location {id} missing")))
    }

    fn service_location_view(
        &self,
        record: &ServiceLocationRecord,
    ) -> Result<ServiceLocation, StoreError> {
        Ok(ServiceLocation {
            id: record.id,
            customer_id: record.customer_id,
            location_id: record.location_id,
            date_taken_over: record.date_taken_over,
            occupants_count: record.occupants_count,
            details: self.details(record.location_id)?.clone(),
            active: record.active,
        })
    }

    fn service_location_of(&self, id: ServiceLocationId) -> Option<&ServiceLocationRecord> {
        self.service_locations.iter().find(|sl| sl.id == id)
    }

    fn device_owner(&self, device: &EnrolledDevice) -> Option<CustomerId> {
        self.service_location_of(device.service_location_id)
            .map(|sl| sl.customer_id)
    }

    fn energy_events<'a>(
        &'a self,
        period: &'a BillingPeriod,
    ) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.events.iter().filter(move |event| {
            event.label == ENERGY_USE_LABEL && period.contains(event.created_at)
        })
    }

    fn devices_at(&self, service_location: ServiceLocationId) -> Vec<EnrolledDeviceId> {
        self.enrolled
            .iter()
            .filter(|device| device.service_location_id == service_location)
            .map(|device| device.id)
            .collect()
    }
}

/// Shared in-memory tables implementing every relational port.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalog device.
    pub async fn add_device(
        &self,
        device_type: &str,
        model_number: &str,
    ) -> Result<DeviceId, StoreError> {
        let mut tables = self.tables.lock().await;
        let id = DeviceId::new(next_id(tables.devices.len())?).map_err(row_error)?;
        tables.devices.push(Device {
            id,
            device_type: device_type.to_owned(),
            model_number: model_number.to_owned(),
        });
        Ok(id)
    }

    /// Record a metered event for an enrolled device.
    pub async fn record_event(
        &self,
        enrolled_device: EnrolledDeviceId,
        label: &str,
        created_at: NaiveDateTime,
        value: f32,
    ) {
        self.tables.lock().await.events.push(EventRecord {
            enrolled_device_id: enrolled_device,
            label: label.to_owned(),
            value,
            created_at,
        });
    }

    /// Set the rate for a zipcode and 1-based hour.
    pub async fn set_price(&self, zipcode: i32, hour: i32, value: f32) {
        let mut tables = self.tables.lock().await;
        tables
            .prices
            .retain(|price| !(price.zipcode == zipcode && price.hour == hour));
        tables.prices.push(HourlyPrice {
            zipcode,
            hour,
            value,
        });
    }

    /// Number of stored customers.
    pub async fn customer_count(&self) -> usize {
        self.tables.lock().await.customers.len()
    }

    /// Number of stored locations.
    pub async fn location_count(&self) -> usize {
        self.tables.lock().await.locations.len()
    }

    /// Active flag of a service location, if it exists.
    pub async fn service_location_active(&self, id: ServiceLocationId) -> Option<bool> {
        self.tables
            .lock()
            .await
            .service_location_of(id)
            .map(|sl| sl.active)
    }

    /// Active flag of an enrolled device, if it exists.
    pub async fn enrolled_device_active(&self, id: EnrolledDeviceId) -> Option<bool> {
        self.tables
            .lock()
            .await
            .enrolled
            .iter()
            .find(|device| device.id == id)
            .map(|device| device.active)
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredCustomer>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .customers
            .iter()
            .find(|stored| stored.customer.email == email)
            .cloned())
    }

    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables
            .customers
            .iter()
            .any(|stored| stored.customer.email == customer.email)
        {
            return Err(StoreError::duplicate("customers_email_key"));
        }
        let id = CustomerId::new(next_id(tables.customers.len())?).map_err(row_error)?;
        let record = Customer {
            id,
            first_name: customer.profile.first_name.clone(),
            last_name: customer.profile.last_name.clone(),
            phone_number: customer.profile.phone_number.clone(),
            email: customer.email.clone(),
            billing_address_id: customer.billing_address_id,
        };
        tables.customers.push(StoredCustomer {
            customer: record.clone(),
            password_hash: customer.password_hash.clone(),
        });
        Ok(record)
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn find_by_address(&self, address: &Address) -> Result<Option<LocationId>, StoreError> {
        Ok(self.tables.lock().await.location_by_address(address))
    }

    async fn insert(&self, details: &LocationDetails) -> Result<LocationId, StoreError> {
        self.tables.lock().await.insert_location(details)
    }
}

#[async_trait]
impl ServiceLocationRepository for InMemoryStore {
    async fn list_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<ServiceLocation>, StoreError> {
        let tables = self.tables.lock().await;
        tables
            .service_locations
            .iter()
            .filter(|sl| sl.customer_id == customer)
            .map(|sl| tables.service_location_view(sl))
            .collect()
    }

    async fn is_owned_by(
        &self,
        id: ServiceLocationId,
        customer: CustomerId,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .service_location_of(id)
            .is_some_and(|sl| sl.customer_id == customer))
    }

    async fn find_at_location(
        &self,
        customer: CustomerId,
        location: LocationId,
    ) -> Result<Option<ServiceLocationId>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .service_locations
            .iter()
            .find(|sl| sl.customer_id == customer && sl.location_id == location)
            .map(|sl| sl.id))
    }

    async fn insert_unique(
        &self,
        draft: &ServiceLocationDraft,
    ) -> Result<ServiceLocationInsert, StoreError> {
        let mut tables = self.tables.lock().await;
        let location_id = match tables.location_by_address(&draft.details.address) {
            Some(id) => id,
            None => tables.insert_location(&draft.details)?,
        };
        if let Some(existing) = tables
            .service_locations
            .iter()
            .find(|sl| sl.customer_id == draft.customer_id && sl.location_id == location_id)
        {
            return Ok(ServiceLocationInsert::AlreadyExists(existing.id));
        }
        let id =
            ServiceLocationId::new(next_id(tables.service_locations.len())?).map_err(row_error)?;
        tables.service_locations.push(ServiceLocationRecord {
            id,
            customer_id: draft.customer_id,
            location_id,
            date_taken_over: draft.date_taken_over,
            occupants_count: draft.occupants_count,
            active: true,
        });
        Ok(ServiceLocationInsert::Created(id))
    }

    async fn update(&self, change: &ServiceLocationChange) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(sl) = tables
            .service_locations
            .iter_mut()
            .find(|sl| sl.id == change.id)
        {
            sl.location_id = change.location_id;
            sl.date_taken_over = change.date_taken_over;
            sl.occupants_count = change.occupants_count;
        }
        Ok(())
    }

    async fn deactivate(&self, id: ServiceLocationId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(sl) = tables.service_locations.iter_mut().find(|sl| sl.id == id) {
            sl.active = false;
        }
        Ok(())
    }
}

#[async_trait]
impl EnrolledDeviceRepository for InMemoryStore {
    async fn list_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<EnrolledDevice>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .enrolled
            .iter()
            .filter(|device| tables.device_owner(device) == Some(customer))
            .cloned()
            .collect())
    }

    async fn is_owned_by(
        &self,
        id: EnrolledDeviceId,
        customer: CustomerId,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .enrolled
            .iter()
            .find(|device| device.id == id)
            .is_some_and(|device| tables.device_owner(device) == Some(customer)))
    }

    async fn insert(&self, draft: &EnrolledDeviceDraft) -> Result<EnrolledDeviceId, StoreError> {
        let mut tables = self.tables.lock().await;
        let id = EnrolledDeviceId::new(next_id(tables.enrolled.len())?).map_err(row_error)?;
        tables.enrolled.push(EnrolledDevice {
            id,
            service_location_id: draft.service_location_id,
            device_id: draft.device_id,
            alias_name: draft.alias_name.clone(),
            room_number: draft.room_number,
            active: true,
        });
        Ok(id)
    }

    async fn update(&self, update: &EnrolledDeviceUpdate) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(device) = tables.enrolled.iter_mut().find(|d| d.id == update.id) {
            device.service_location_id = update.draft.service_location_id;
            device.device_id = update.draft.device_id;
            device.alias_name = update.draft.alias_name.clone();
            device.room_number = update.draft.room_number;
        }
        Ok(())
    }

    async fn deactivate(&self, id: EnrolledDeviceId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(device) = tables.enrolled.iter_mut().find(|d| d.id == id) {
            device.active = false;
        }
        Ok(())
    }
}

#[async_trait]
impl DeviceCatalog for InMemoryStore {
    async fn list_devices(&self) -> Result<Vec<Device>, StoreError> {
        Ok(self.tables.lock().await.devices.clone())
    }
}

#[async_trait]
impl EnergyUsageRepository for InMemoryStore {
    async fn location_usage(
        &self,
        customer: CustomerId,
        period: &BillingPeriod,
    ) -> Result<Vec<LocationHourlyUsage>, StoreError> {
        let tables = self.tables.lock().await;
        let mut owned: Vec<&ServiceLocationRecord> = tables
            .service_locations
            .iter()
            .filter(|sl| sl.customer_id == customer)
            .collect();
        owned.sort_by_key(|sl| (sl.location_id, sl.id));

        let mut rows = Vec::new();
        for sl in owned {
            let address = tables.details(sl.location_id)?.address.clone();
            let devices = tables.devices_at(sl.id);
            let mut hourly = [None::<f32>; 24];
            for event in tables
                .energy_events(period)
                .filter(|event| devices.contains(&event.enrolled_device_id))
            {
                let slot = &mut hourly[event.created_at.hour() as usize];
                *slot = Some(slot.unwrap_or(0.0) + event.value);
            }
            let before = rows.len();
            for (hour, consumption) in hourly.iter().enumerate() {
                if let Some(consumption) = consumption {
                    rows.push(LocationHourlyUsage {
                        location_id: sl.location_id,
                        address: address.clone(),
                        hour_of_day: i32::try_from(hour).ok(),
                        consumption: *consumption,
                    });
                }
            }
            if rows.len() == before {
                rows.push(LocationHourlyUsage {
                    location_id: sl.location_id,
                    address,
                    hour_of_day: None,
                    consumption: 0.0,
                });
            }
        }
        Ok(rows)
    }

    async fn location_footprints(
        &self,
        period: &BillingPeriod,
    ) -> Result<Vec<LocationFootprint>, StoreError> {
        let tables = self.tables.lock().await;
        let mut footprints = Vec::new();
        for (location_id, details) in &tables.locations {
            let held: Vec<ServiceLocationId> = tables
                .service_locations
                .iter()
                .filter(|sl| sl.location_id == *location_id)
                .map(|sl| sl.id)
                .collect();
            let devices: Vec<EnrolledDeviceId> =
                held.iter().flat_map(|sl| tables.devices_at(*sl)).collect();
            let consumption = tables
                .energy_events(period)
                .filter(|event| devices.contains(&event.enrolled_device_id))
                .map(|event| event.value)
                .sum();
            footprints.push(LocationFootprint {
                location_id: *location_id,
                square_footage: details.square_footage,
                consumption,
            });
        }
        Ok(footprints)
    }

    async fn hourly_prices(&self) -> Result<Vec<HourlyPrice>, StoreError> {
        let mut prices = self.tables.lock().await.prices.clone();
        prices.sort_by_key(|price| (price.zipcode, price.hour));
        Ok(prices)
    }

    async fn device_usage(
        &self,
        customer: CustomerId,
        period: &BillingPeriod,
    ) -> Result<Vec<DeviceUsage>, StoreError> {
        let tables = self.tables.lock().await;
        let mut usage = Vec::new();
        for device in tables
            .enrolled
            .iter()
            .filter(|device| tables.device_owner(device) == Some(customer))
        {
            let Some(catalog) = tables.devices.iter().find(|d| d.id == device.device_id) else {
                continue;
            };
            let consumption = tables
                .energy_events(period)
                .filter(|event| event.enrolled_device_id == device.id)
                .map(|event| event.value)
                .sum();
            usage.push(DeviceUsage {
                enrolled_device_id: device.id,
                alias_name: device.alias_name.clone(),
                device_type: catalog.device_type.clone(),
                model_number: catalog.model_number.clone(),
                consumption,
            });
        }
        Ok(usage)
    }
}

/// Reversible "hash" for tests where Argon2 cost would dominate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextHasher;

const PLAINTEXT_PREFIX: &str = "plain$";

#[async_trait]
impl CredentialHasher for PlaintextHasher {
    async fn hash(&self, password: &str) -> Result<String, CredentialHashError> {
        Ok(format!("{PLAINTEXT_PREFIX}{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHashError> {
        let stored = hash
            .strip_prefix(PLAINTEXT_PREFIX)
            .ok_or_else(|| CredentialHashError::invalid_hash_format("missing plain$ prefix"))?;
        Ok(stored == password)
    }
}

/// Services wired over one shared [`InMemoryStore`].
pub struct InMemoryServices {
    pub store: InMemoryStore,
    pub locks: Arc<InMemoryLockStore>,
    pub accounts: AccountService<InMemoryStore, InMemoryStore, PlaintextHasher>,
    pub dashboard: DashboardService<InMemoryStore>,
    pub service_locations: ServiceLocationService<InMemoryStore, InMemoryStore>,
    pub enrolled_devices: EnrolledDeviceService<InMemoryStore, InMemoryStore, InMemoryStore>,
}

impl InMemoryServices {
    /// Fresh store, lock store and services.
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let shared = Arc::new(store.clone());
        let locks = Arc::new(InMemoryLockStore::new());
        let lock = AdvisoryLock::new(locks.clone(), Duration::from_secs(60));
        Self {
            accounts: AccountService::new(shared.clone(), shared.clone(), Arc::new(PlaintextHasher)),
            dashboard: DashboardService::new(shared.clone()),
            service_locations: ServiceLocationService::new(
                shared.clone(),
                shared.clone(),
                lock.clone(),
            ),
            enrolled_devices: EnrolledDeviceService::new(shared.clone(), shared.clone(), shared, lock),
            store,
            locks,
        }
    }
}

impl Default for InMemoryServices {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP state backed entirely by in-memory adapters.
pub fn in_memory_http_state() -> HttpState {
    let InMemoryServices {
        accounts,
        dashboard,
        service_locations,
        enrolled_devices,
        ..
    } = InMemoryServices::new();
    let service_locations = Arc::new(service_locations);
    let enrolled_devices = Arc::new(enrolled_devices);
    HttpState {
        accounts: Arc::new(accounts),
        dashboard: Arc::new(dashboard),
        service_locations: service_locations.clone(),
        service_locations_query: service_locations,
        enrolled_devices: enrolled_devices.clone(),
        enrolled_devices_query: enrolled_devices,
    }
}
