//! PostgreSQL-backed `EnrolledDeviceRepository` and `DeviceCatalog`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeviceCatalog, EnrolledDeviceRepository, StoreError};
use crate::domain::{
    CustomerId, Device, EnrolledDevice, EnrolledDeviceDraft, EnrolledDeviceId,
    EnrolledDeviceUpdate,
};

use super::diesel_helpers::{convert_rows, map_diesel_error, map_pool_error, map_row_error};
use super::models::{DeviceRow, EnrolledDeviceRow, EnrolledDeviceValues};
use super::pool::DbPool;
use super::schema::{devices, enrolled_devices, service_locations};

/// Diesel-backed enrolled device storage and catalog reads.
#[derive(Clone)]
pub struct DieselEnrolledDeviceRepository {
    pool: DbPool,
}

impl DieselEnrolledDeviceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn values(draft: &EnrolledDeviceDraft) -> EnrolledDeviceValues<'_> {
    EnrolledDeviceValues {
        service_location_id: draft.service_location_id.get(),
        device_id: draft.device_id.get(),
        alias_name: &draft.alias_name,
        room_number: draft.room_number,
    }
}

#[async_trait]
impl EnrolledDeviceRepository for DieselEnrolledDeviceRepository {
    async fn list_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<EnrolledDevice>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EnrolledDeviceRow> = enrolled_devices::table
            .inner_join(service_locations::table)
            .filter(service_locations::customer_id.eq(customer.get()))
            .order_by(enrolled_devices::id)
            .select(EnrolledDeviceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn is_owned_by(
        &self,
        id: EnrolledDeviceId,
        customer: CustomerId,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            enrolled_devices::table
                .inner_join(service_locations::table)
                .filter(enrolled_devices::id.eq(id.get()))
                .filter(service_locations::customer_id.eq(customer.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(&self, draft: &EnrolledDeviceDraft) -> Result<EnrolledDeviceId, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i32 = diesel::insert_into(enrolled_devices::table)
            .values(values(draft))
            .returning(enrolled_devices::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        EnrolledDeviceId::new(id).map_err(map_row_error)
    }

    async fn update(&self, update: &EnrolledDeviceUpdate) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(enrolled_devices::table.find(update.id.get()))
            .set(values(&update.draft))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn deactivate(&self, id: EnrolledDeviceId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(enrolled_devices::table.find(id.get()))
            .set(enrolled_devices::active.eq(false))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl DeviceCatalog for DieselEnrolledDeviceRepository {
    async fn list_devices(&self) -> Result<Vec<Device>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DeviceRow> = devices::table
            .order_by(devices::id)
            .select(DeviceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }
}
