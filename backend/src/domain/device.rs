//! Device catalog entries and devices enrolled at service locations.

use serde::Serialize;
use utoipa::ToSchema;

use super::ids::{CustomerId, DeviceId, EnrolledDeviceId, ServiceLocationId};
use super::location::ServiceLocation;

/// Catalog device. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub device_type: String,
    pub model_number: String,
}

impl Device {
    /// Name shown in device pickers: `model (type)`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.model_number, self.device_type)
    }
}

/// A catalog device activated at a service location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledDevice {
    pub id: EnrolledDeviceId,
    pub service_location_id: ServiceLocationId,
    pub device_id: DeviceId,
    pub alias_name: String,
    pub room_number: i32,
    pub active: bool,
}

/// Input for enrolling a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledDeviceDraft {
    pub customer_id: CustomerId,
    pub service_location_id: ServiceLocationId,
    pub device_id: DeviceId,
    pub alias_name: String,
    pub room_number: i32,
}

/// Input for changing an enrolled device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledDeviceUpdate {
    pub id: EnrolledDeviceId,
    pub draft: EnrolledDeviceDraft,
}

/// Enrolled device annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledDeviceView {
    #[serde(flatten)]
    pub enrolled: EnrolledDevice,
    pub service_location: String,
    pub device_type: String,
    pub device: String,
}

/// Catalog device offered for enrolment, with its picker name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDevice {
    #[serde(flatten)]
    pub device: Device,
    pub device_name: String,
}

impl From<Device> for CatalogDevice {
    fn from(device: Device) -> Self {
        Self {
            device_name: device.display_name(),
            device,
        }
    }
}

/// Everything the device management page needs in one read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledDeviceOverview {
    pub enrolled_devices: Vec<EnrolledDeviceView>,
    pub devices: Vec<CatalogDevice>,
    pub service_locations: Vec<ServiceLocation>,
}

impl EnrolledDeviceOverview {
    /// Join enrolled devices with the catalog and the customer's locations.
    ///
    /// Devices whose catalog entry or service location is missing keep empty
    /// labels rather than being dropped.
    #[must_use]
    pub fn assemble(
        enrolled: Vec<EnrolledDevice>,
        devices: Vec<Device>,
        service_locations: Vec<ServiceLocation>,
    ) -> Self {
        let enrolled_devices = enrolled
            .into_iter()
            .map(|device| {
                let catalog = devices.iter().find(|d| d.id == device.device_id);
                let location = service_locations
                    .iter()
                    .find(|sl| sl.id == device.service_location_id);
                EnrolledDeviceView {
                    service_location: location.map(ServiceLocation::label).unwrap_or_default(),
                    device_type: catalog.map(|d| d.device_type.clone()).unwrap_or_default(),
                    device: catalog.map(Device::display_name).unwrap_or_default(),
                    enrolled: device,
                }
            })
            .collect();
        Self {
            enrolled_devices,
            devices: devices.into_iter().map(CatalogDevice::from).collect(),
            service_locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::{Address, LocationDetails};
    use crate::domain::LocationId;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn thermostat() -> Device {
        Device {
            id: DeviceId::new(2).expect("id"),
            device_type: "Thermostat".into(),
            model_number: "T-1000".into(),
        }
    }

    fn service_location() -> ServiceLocation {
        ServiceLocation {
            id: ServiceLocationId::new(9).expect("id"),
            customer_id: CustomerId::new(1).expect("id"),
            location_id: LocationId::new(4).expect("id"),
            date_taken_over: NaiveDate::from_ymd_opt(2023, 5, 1).expect("date"),
            occupants_count: 2,
            details: LocationDetails {
                address: Address {
                    unit_number: 5,
                    street: 100,
                    city: "Springfield".into(),
                    state: "IL".into(),
                    zipcode: 62704,
                    country: "US".into(),
                },
                square_footage: 900.0,
                bedrooms_count: 2,
            },
            active: true,
        }
    }

    fn enrolled(device_id: i32) -> EnrolledDevice {
        EnrolledDevice {
            id: EnrolledDeviceId::new(11).expect("id"),
            service_location_id: ServiceLocationId::new(9).expect("id"),
            device_id: DeviceId::new(device_id).expect("id"),
            alias_name: "Hall".into(),
            room_number: 1,
            active: true,
        }
    }

    #[rstest]
    fn display_name_puts_model_first() {
        assert_eq!(thermostat().display_name(), "T-1000 (Thermostat)");
    }

    #[rstest]
    fn overview_labels_devices_from_catalog_and_location() {
        let overview = EnrolledDeviceOverview::assemble(
            vec![enrolled(2)],
            vec![thermostat()],
            vec![service_location()],
        );
        let view = overview.enrolled_devices.first().expect("one device");
        assert_eq!(view.device, "T-1000 (Thermostat)");
        assert_eq!(view.device_type, "Thermostat");
        assert_eq!(view.service_location, "5, 100, Springfield, IL, 62704, US");
    }

    #[rstest]
    fn catalog_entries_carry_their_picker_name() {
        let overview = EnrolledDeviceOverview::assemble(vec![], vec![thermostat()], vec![]);
        let entry = overview.devices.first().expect("one catalog device");
        assert_eq!(entry.device_name, "T-1000 (Thermostat)");

        let json = serde_json::to_value(entry).expect("serialise");
        assert_eq!(json["deviceName"], "T-1000 (Thermostat)");
        assert_eq!(json["modelNumber"], "T-1000");
        assert_eq!(json["deviceType"], "Thermostat");
    }

    #[rstest]
    fn overview_keeps_devices_missing_from_catalog() {
        let overview = EnrolledDeviceOverview::assemble(vec![enrolled(3)], vec![], vec![]);
        let view = overview.enrolled_devices.first().expect("one device");
        assert!(view.device.is_empty());
        assert!(view.service_location.is_empty());
    }
}
