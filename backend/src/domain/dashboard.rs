//! Dashboard aggregation: per-location cost, peer benchmark, device totals.
//!
//! The store hands back usage already summed per (location, hour of day) for
//! the billing window. Everything else happens here:
//!
//! - cost is `consumption * price(zipcode, hour + 1)`; prices are indexed by
//!   1-based hour, event hours are 0-based;
//! - a location's peers are all locations whose square footage lies within
//!   ±5% of its own (inclusive), itself included;
//! - values stay `f32` throughout, so totals are only stable up to rounding.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::ids::{EnrolledDeviceId, LocationId};
use super::location::Address;

/// Event label that carries metered consumption.
pub const ENERGY_USE_LABEL: &str = "energy use";

/// Relative square-footage tolerance for peer comparison.
pub const PEER_TOLERANCE: f32 = 0.05;

/// One row of the price table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPrice {
    pub zipcode: i32,
    /// Hour of day, 1 through 24.
    pub hour: i32,
    pub value: f32,
}

/// Consumption at one of the customer's locations during one hour of day.
///
/// `hour_of_day` is `None` for a location with no events in the window.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationHourlyUsage {
    pub location_id: LocationId,
    pub address: Address,
    pub hour_of_day: Option<i32>,
    pub consumption: f32,
}

/// Square footage and window consumption of one location, system-wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFootprint {
    pub location_id: LocationId,
    pub square_footage: f32,
    pub consumption: f32,
}

/// Window consumption of one enrolled device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceUsage {
    pub enrolled_device_id: EnrolledDeviceId,
    pub alias_name: String,
    pub device_type: String,
    pub model_number: String,
    pub consumption: f32,
}

/// Cost and consumption summary for one location.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocationCost {
    pub location_id: LocationId,
    #[serde(flatten)]
    pub address: Address,
    pub energy_consumption: f32,
    pub energy_cost: f32,
    pub similar_locations_average_energy_consumption: f32,
}

/// Labelled consumption of one enrolled device.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConsumption {
    pub device_label: String,
    pub energy_consumption: f32,
}

/// Everything the dashboard renders for one customer and month.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub service_location_costs: Vec<ServiceLocationCost>,
    pub total_energy_consumption: f32,
    pub total_energy_cost: f32,
    pub hourly_prices: Vec<HourlyPrice>,
    pub enrolled_devices: Vec<DeviceConsumption>,
}

/// Raw inputs for one dashboard, as read from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardInputs {
    pub location_usage: Vec<LocationHourlyUsage>,
    pub footprints: Vec<LocationFootprint>,
    pub prices: Vec<HourlyPrice>,
    pub device_usage: Vec<DeviceUsage>,
}

/// Price lookup keyed by zipcode and 1-based hour.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    rates: HashMap<(i32, i32), f32>,
}

impl PriceTable {
    /// Index a price list. Later duplicates win.
    #[must_use]
    pub fn new(prices: &[HourlyPrice]) -> Self {
        let rates = prices
            .iter()
            .map(|price| ((price.zipcode, price.hour), price.value))
            .collect();
        Self { rates }
    }

    /// Rate for an event recorded during `hour_of_day` (0 through 23).
    #[must_use]
    pub fn rate_for_event_hour(&self, zipcode: i32, hour_of_day: i32) -> Option<f32> {
        self.rates.get(&(zipcode, hour_of_day + 1)).copied()
    }
}

/// Average consumption of comparable locations, indexed for repeated lookup.
#[derive(Debug, Clone, Default)]
pub struct PeerBenchmark {
    by_size: Vec<LocationFootprint>,
    square_footage: HashMap<LocationId, f32>,
}

impl PeerBenchmark {
    /// Build the benchmark over every known location.
    #[must_use]
    pub fn new(mut footprints: Vec<LocationFootprint>) -> Self {
        footprints.sort_by(|a, b| a.square_footage.total_cmp(&b.square_footage));
        let square_footage = footprints
            .iter()
            .map(|f| (f.location_id, f.square_footage))
            .collect();
        Self {
            by_size: footprints,
            square_footage,
        }
    }

    /// Mean consumption across locations within tolerance of `location_id`.
    ///
    /// Returns `None` for a location the benchmark has never seen. The
    /// divisor falls back to 1 when nothing qualifies.
    #[must_use]
    pub fn average_for(&self, location_id: LocationId) -> Option<f32> {
        let size = *self.square_footage.get(&location_id)?;
        let lower = size * (1.0 - PEER_TOLERANCE);
        let upper = size * (1.0 + PEER_TOLERANCE);
        let from = self.by_size.partition_point(|f| f.square_footage < lower);
        let to = self.by_size.partition_point(|f| f.square_footage <= upper);
        let peers = self.by_size.get(from..to).unwrap_or_default();
        let total: f32 = peers.iter().map(|f| f.consumption).sum();
        #[expect(clippy::cast_precision_loss, reason = "peer counts are small")]
        let count = peers.len().max(1) as f32;
        Some(total / count)
    }
}

/// Fold hourly usage rows into one summary per location.
///
/// Locations keep the order in which they first appear. Peer averages are
/// left at zero for [`attach_peer_averages`] to fill in.
#[must_use]
pub fn summarise_locations(
    usage: &[LocationHourlyUsage],
    prices: &PriceTable,
) -> Vec<ServiceLocationCost> {
    let mut order: Vec<LocationId> = Vec::new();
    let mut summaries: HashMap<LocationId, ServiceLocationCost> = HashMap::new();

    for row in usage {
        let summary = summaries.entry(row.location_id).or_insert_with(|| {
            order.push(row.location_id);
            ServiceLocationCost {
                location_id: row.location_id,
                address: row.address.clone(),
                energy_consumption: 0.0,
                energy_cost: 0.0,
                similar_locations_average_energy_consumption: 0.0,
            }
        });
        let Some(hour) = row.hour_of_day else {
            continue;
        };
        summary.energy_consumption += row.consumption;
        if let Some(rate) = prices.rate_for_event_hour(row.address.zipcode, hour) {
            summary.energy_cost += row.consumption * rate;
        }
    }

    order
        .into_iter()
        .filter_map(|id| summaries.remove(&id))
        .collect()
}

/// Fill in each summary's peer average; unknown locations get zero.
pub fn attach_peer_averages(costs: &mut [ServiceLocationCost], benchmark: &PeerBenchmark) {
    for cost in costs {
        cost.similar_locations_average_energy_consumption =
            benchmark.average_for(cost.location_id).unwrap_or(0.0);
    }
}

/// Label each device `alias (type - model)`.
#[must_use]
pub fn label_devices(usage: Vec<DeviceUsage>) -> Vec<DeviceConsumption> {
    usage
        .into_iter()
        .map(|device| DeviceConsumption {
            device_label: format!(
                "{} ({} - {})",
                device.alias_name, device.device_type, device.model_number
            ),
            energy_consumption: device.consumption,
        })
        .collect()
}

impl DashboardReport {
    /// Combine store reads into the final report.
    #[must_use]
    pub fn assemble(inputs: DashboardInputs) -> Self {
        let DashboardInputs {
            location_usage,
            footprints,
            prices,
            device_usage,
        } = inputs;

        let table = PriceTable::new(&prices);
        let mut service_location_costs = summarise_locations(&location_usage, &table);
        attach_peer_averages(&mut service_location_costs, &PeerBenchmark::new(footprints));

        let total_energy_consumption = service_location_costs
            .iter()
            .map(|c| c.energy_consumption)
            .sum();
        let total_energy_cost = service_location_costs.iter().map(|c| c.energy_cost).sum();

        Self {
            service_location_costs,
            total_energy_consumption,
            total_energy_cost,
            hourly_prices: prices,
            enrolled_devices: label_devices(device_usage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const EPSILON: f32 = 1e-3;

    fn location(raw: i32) -> LocationId {
        LocationId::new(raw).expect("valid id")
    }

    fn address(zipcode: i32) -> Address {
        Address {
            unit_number: 1,
            street: 10,
            city: "Springfield".into(),
            state: "IL".into(),
            zipcode,
            country: "US".into(),
        }
    }

    fn usage(id: i32, zipcode: i32, hour: Option<i32>, consumption: f32) -> LocationHourlyUsage {
        LocationHourlyUsage {
            location_id: location(id),
            address: address(zipcode),
            hour_of_day: hour,
            consumption,
        }
    }

    fn footprint(id: i32, square_footage: f32, consumption: f32) -> LocationFootprint {
        LocationFootprint {
            location_id: location(id),
            square_footage,
            consumption,
        }
    }

    #[fixture]
    fn prices() -> Vec<HourlyPrice> {
        vec![
            HourlyPrice { zipcode: 62704, hour: 1, value: 0.10 },
            HourlyPrice { zipcode: 62704, hour: 2, value: 0.20 },
            HourlyPrice { zipcode: 62704, hour: 24, value: 0.50 },
            HourlyPrice { zipcode: 10001, hour: 1, value: 1.00 },
        ]
    }

    #[rstest]
    fn event_hour_maps_to_next_price_hour(prices: Vec<HourlyPrice>) {
        let table = PriceTable::new(&prices);
        assert_eq!(table.rate_for_event_hour(62704, 0), Some(0.10));
        assert_eq!(table.rate_for_event_hour(62704, 23), Some(0.50));
        assert_eq!(table.rate_for_event_hour(62704, 5), None);
    }

    #[rstest]
    fn cost_uses_location_zipcode_and_hour(prices: Vec<HourlyPrice>) {
        let rows = vec![
            usage(1, 62704, Some(0), 10.0),
            usage(1, 62704, Some(1), 5.0),
            usage(2, 10001, Some(0), 3.0),
        ];
        let costs = summarise_locations(&rows, &PriceTable::new(&prices));

        let first = costs.first().expect("first location");
        assert!((first.energy_consumption - 15.0).abs() < EPSILON);
        assert!((first.energy_cost - 2.0).abs() < EPSILON);
        let second = costs.get(1).expect("second location");
        assert!((second.energy_cost - 3.0).abs() < EPSILON);
    }

    #[rstest]
    fn unpriced_hours_add_consumption_but_no_cost(prices: Vec<HourlyPrice>) {
        let rows = vec![usage(1, 62704, Some(7), 4.0)];
        let costs = summarise_locations(&rows, &PriceTable::new(&prices));
        let only = costs.first().expect("location");
        assert!((only.energy_consumption - 4.0).abs() < EPSILON);
        assert!(only.energy_cost.abs() < EPSILON);
    }

    #[rstest]
    fn location_without_events_reports_zero(prices: Vec<HourlyPrice>) {
        let rows = vec![usage(3, 62704, None, 0.0)];
        let costs = summarise_locations(&rows, &PriceTable::new(&prices));
        assert_eq!(costs.len(), 1);
        let only = costs.first().expect("location");
        assert!(only.energy_consumption.abs() < EPSILON);
        assert!(only.energy_cost.abs() < EPSILON);
    }

    #[rstest]
    fn empty_inputs_produce_empty_report() {
        let report = DashboardReport::assemble(DashboardInputs::default());
        assert!(report.service_location_costs.is_empty());
        assert!(report.enrolled_devices.is_empty());
        assert!(report.total_energy_consumption.abs() < EPSILON);
        assert!(report.total_energy_cost.abs() < EPSILON);
    }

    #[rstest]
    fn totals_ignore_row_order(prices: Vec<HourlyPrice>) {
        let rows = vec![
            usage(1, 62704, Some(0), 10.25),
            usage(2, 10001, Some(0), 3.5),
            usage(1, 62704, Some(1), 5.125),
            usage(2, 10001, Some(4), 1.75),
            usage(3, 62704, Some(23), 0.3),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let forward = DashboardReport::assemble(DashboardInputs {
            location_usage: rows,
            prices: prices.clone(),
            ..DashboardInputs::default()
        });
        let backward = DashboardReport::assemble(DashboardInputs {
            location_usage: reversed,
            prices,
            ..DashboardInputs::default()
        });

        assert!(
            (forward.total_energy_consumption - backward.total_energy_consumption).abs() < EPSILON
        );
        assert!((forward.total_energy_cost - backward.total_energy_cost).abs() < EPSILON);
    }

    #[rstest]
    fn location_without_peers_averages_to_itself() {
        let benchmark = PeerBenchmark::new(vec![
            footprint(1, 1000.0, 42.0),
            footprint(2, 2000.0, 7.0),
        ]);
        let average = benchmark.average_for(location(1)).expect("known location");
        assert!((average - 42.0).abs() < EPSILON);
    }

    #[rstest]
    #[case(950.0, true)]
    #[case(1050.0, true)]
    #[case(949.0, false)]
    #[case(1051.0, false)]
    fn peer_window_is_inclusive(#[case] other_size: f32, #[case] counted: bool) {
        let benchmark = PeerBenchmark::new(vec![
            footprint(1, 1000.0, 10.0),
            footprint(2, other_size, 20.0),
        ]);
        let average = benchmark.average_for(location(1)).expect("known location");
        let expected = if counted { 15.0 } else { 10.0 };
        assert!((average - expected).abs() < EPSILON, "got {average}");
    }

    #[rstest]
    fn zero_square_footage_never_divides_by_zero() {
        let benchmark = PeerBenchmark::new(vec![footprint(1, 0.0, 0.0)]);
        let average = benchmark.average_for(location(1)).expect("known location");
        assert!(average.is_finite());
    }

    #[rstest]
    fn unknown_location_gets_zero_average() {
        let mut costs = summarise_locations(
            &[usage(8, 62704, Some(0), 1.0)],
            &PriceTable::default(),
        );
        attach_peer_averages(&mut costs, &PeerBenchmark::default());
        let only = costs.first().expect("location");
        assert!(only.similar_locations_average_energy_consumption.abs() < EPSILON);
    }

    #[rstest]
    fn devices_are_labelled_with_alias_type_and_model() {
        let labelled = label_devices(vec![DeviceUsage {
            enrolled_device_id: EnrolledDeviceId::new(1).expect("id"),
            alias_name: "Kitchen fridge".into(),
            device_type: "Refrigerator".into(),
            model_number: "RF-22".into(),
            consumption: 3.5,
        }]);
        let only = labelled.first().expect("device");
        assert_eq!(only.device_label, "Kitchen fridge (Refrigerator - RF-22)");
        assert!((only.energy_consumption - 3.5).abs() < EPSILON);
    }

    #[rstest]
    fn report_serialises_with_camel_case_keys(prices: Vec<HourlyPrice>) {
        let report = DashboardReport::assemble(DashboardInputs {
            location_usage: vec![usage(1, 62704, Some(0), 1.0)],
            footprints: vec![footprint(1, 900.0, 1.0)],
            prices,
            device_usage: vec![],
        });
        let value = serde_json::to_value(&report).expect("serialise");
        let first = &value["serviceLocationCosts"][0];
        assert_eq!(first["locationId"], 1);
        assert_eq!(first["zipcode"], 62704);
        assert!(first.get("similarLocationsAverageEnergyConsumption").is_some());
        assert!(value.get("hourlyPrices").is_some());
    }
}
