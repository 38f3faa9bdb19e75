//! PostgreSQL-backed `ServiceLocationRepository`.
//!
//! `insert_unique` resolves the location, checks for an existing service
//! location at the same address, and inserts, all inside one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ServiceLocationChange, ServiceLocationRepository, StoreError};
use crate::domain::{
    CustomerId, LocationId, ServiceLocation, ServiceLocationDraft, ServiceLocationId,
    ServiceLocationInsert,
};

use super::diesel_helpers::{map_diesel_error, map_pool_error, map_row_error};
use super::diesel_location_repository::find_location_id;
use super::models::{
    LocationRow, NewLocationRow, NewServiceLocationRow, ServiceLocationChangeset,
    ServiceLocationRow,
};
use super::pool::DbPool;
use super::schema::{locations, service_locations};

/// Diesel-backed service location storage.
#[derive(Clone)]
pub struct DieselServiceLocationRepository {
    pool: DbPool,
}

impl DieselServiceLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

enum InsertOutcome {
    Created(i32),
    Existing(i32),
}

#[async_trait]
impl ServiceLocationRepository for DieselServiceLocationRepository {
    async fn list_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<ServiceLocation>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ServiceLocationRow, LocationRow)> = service_locations::table
            .inner_join(locations::table)
            .filter(service_locations::customer_id.eq(customer.get()))
            .order_by(service_locations::id)
            .select((ServiceLocationRow::as_select(), LocationRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, location)| row.with_location(location).map_err(map_row_error))
            .collect()
    }

    async fn is_owned_by(
        &self,
        id: ServiceLocationId,
        customer: CustomerId,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            service_locations::table
                .filter(service_locations::id.eq(id.get()))
                .filter(service_locations::customer_id.eq(customer.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn find_at_location(
        &self,
        customer: CustomerId,
        location: LocationId,
    ) -> Result<Option<ServiceLocationId>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: Option<i32> = service_locations::table
            .filter(service_locations::customer_id.eq(customer.get()))
            .filter(service_locations::location_id.eq(location.get()))
            .select(service_locations::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        id.map(ServiceLocationId::new)
            .transpose()
            .map_err(map_row_error)
    }

    async fn insert_unique(
        &self,
        draft: &ServiceLocationDraft,
    ) -> Result<ServiceLocationInsert, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let customer_id = draft.customer_id.get();

        let outcome = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(locations::table)
                        .values(NewLocationRow::from(&draft.details))
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                    let location_id = find_location_id(conn, &draft.details.address)
                        .await?
                        .ok_or(diesel::result::Error::NotFound)?;

                    let existing: Option<i32> = service_locations::table
                        .filter(service_locations::customer_id.eq(customer_id))
                        .filter(service_locations::location_id.eq(location_id))
                        .select(service_locations::id)
                        .first(conn)
                        .await
                        .optional()?;
                    if let Some(id) = existing {
                        return Ok(InsertOutcome::Existing(id));
                    }

                    let id = diesel::insert_into(service_locations::table)
                        .values(NewServiceLocationRow {
                            customer_id,
                            location_id,
                            date_taken_over: draft.date_taken_over,
                            occupants_count: draft.occupants_count,
                        })
                        .returning(service_locations::id)
                        .get_result(conn)
                        .await?;
                    Ok(InsertOutcome::Created(id))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match outcome {
            InsertOutcome::Created(id) => ServiceLocationId::new(id)
                .map(ServiceLocationInsert::Created)
                .map_err(map_row_error),
            InsertOutcome::Existing(id) => ServiceLocationId::new(id)
                .map(ServiceLocationInsert::AlreadyExists)
                .map_err(map_row_error),
        }
    }

    async fn update(&self, change: &ServiceLocationChange) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(service_locations::table.find(change.id.get()))
            .set(ServiceLocationChangeset {
                location_id: change.location_id.get(),
                date_taken_over: change.date_taken_over,
                occupants_count: change.occupants_count,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn deactivate(&self, id: ServiceLocationId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(service_locations::table.find(id.get()))
            .set(service_locations::active.eq(false))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
