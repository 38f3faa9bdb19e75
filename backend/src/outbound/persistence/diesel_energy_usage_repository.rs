//! PostgreSQL-backed `EnergyUsageRepository`.
//!
//! Aggregates run as raw SQL with bound parameters; the window bounds are
//! inclusive on both ends. Cost is not computed here: usage comes back per
//! location and hour of day and the domain applies the price table.
//!
//! Footprints cover every location, including billing-only addresses with
//! no service location; those count as peers with zero consumption.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Int4, Text, Timestamp};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EnergyUsageRepository, StoreError};
use crate::domain::{
    BillingPeriod, CustomerId, DeviceUsage, ENERGY_USE_LABEL, HourlyPrice, LocationFootprint,
    LocationHourlyUsage,
};

use super::diesel_helpers::{convert_rows, map_diesel_error, map_pool_error};
use super::models::{DeviceUsageRow, FootprintRow, LocationUsageRow, PriceRow};
use super::pool::DbPool;
use super::schema::prices;

const LOCATION_USAGE_SQL: &str = r#"
SELECT l.id AS location_id, l.unit_number, l.street, l.city, l.state, l.zipcode, l.country,
       usage.hour_of_day,
       COALESCE(usage.consumption, 0)::REAL AS consumption
FROM service_locations sl
JOIN locations l ON l.id = sl.location_id
LEFT JOIN (
    SELECT ed.service_location_id,
           EXTRACT(HOUR FROM e.created_at)::INTEGER AS hour_of_day,
           SUM(e.value)::REAL AS consumption
    FROM enrolled_devices ed
    JOIN events e ON e.enrolled_device_id = ed.id
    WHERE e.label = $2 AND e.created_at BETWEEN $3 AND $4
    GROUP BY ed.service_location_id, hour_of_day
) usage ON usage.service_location_id = sl.id
WHERE sl.customer_id = $1
ORDER BY l.id, usage.hour_of_day
"#;

const FOOTPRINTS_SQL: &str = r#"
SELECT l.id AS location_id, l.square_footage,
       COALESCE(SUM(e.value), 0)::REAL AS consumption
FROM locations l
LEFT JOIN service_locations sl ON sl.location_id = l.id
LEFT JOIN enrolled_devices ed ON ed.service_location_id = sl.id
LEFT JOIN events e
       ON e.enrolled_device_id = ed.id
      AND e.label = $1
      AND e.created_at BETWEEN $2 AND $3
GROUP BY l.id, l.square_footage
"#;

const DEVICE_USAGE_SQL: &str = r#"
SELECT ed.id AS enrolled_device_id, ed.alias_name, d.device_type, d.model_number,
       COALESCE(SUM(e.value), 0)::REAL AS consumption
FROM enrolled_devices ed
JOIN service_locations sl ON sl.id = ed.service_location_id
JOIN devices d ON d.id = ed.device_id
LEFT JOIN events e
       ON e.enrolled_device_id = ed.id
      AND e.label = $2
      AND e.created_at BETWEEN $3 AND $4
WHERE sl.customer_id = $1
GROUP BY ed.id, ed.alias_name, d.device_type, d.model_number
ORDER BY ed.id
"#;

/// Diesel-backed usage aggregates for the dashboard.
#[derive(Clone)]
pub struct DieselEnergyUsageRepository {
    pool: DbPool,
}

impl DieselEnergyUsageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnergyUsageRepository for DieselEnergyUsageRepository {
    async fn location_usage(
        &self,
        customer: CustomerId,
        period: &BillingPeriod,
    ) -> Result<Vec<LocationHourlyUsage>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LocationUsageRow> = sql_query(LOCATION_USAGE_SQL)
            .bind::<Int4, _>(customer.get())
            .bind::<Text, _>(ENERGY_USE_LABEL)
            .bind::<Timestamp, _>(period.start())
            .bind::<Timestamp, _>(period.end())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn location_footprints(
        &self,
        period: &BillingPeriod,
    ) -> Result<Vec<LocationFootprint>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<FootprintRow> = sql_query(FOOTPRINTS_SQL)
            .bind::<Text, _>(ENERGY_USE_LABEL)
            .bind::<Timestamp, _>(period.start())
            .bind::<Timestamp, _>(period.end())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn hourly_prices(&self) -> Result<Vec<HourlyPrice>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PriceRow> = prices::table
            .order_by((prices::zipcode, prices::hour))
            .select(PriceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(HourlyPrice::from).collect())
    }

    async fn device_usage(
        &self,
        customer: CustomerId,
        period: &BillingPeriod,
    ) -> Result<Vec<DeviceUsage>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DeviceUsageRow> = sql_query(DEVICE_USAGE_SQL)
            .bind::<Int4, _>(customer.get())
            .bind::<Text, _>(ENERGY_USE_LABEL)
            .bind::<Timestamp, _>(period.start())
            .bind::<Timestamp, _>(period.end())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }
}
