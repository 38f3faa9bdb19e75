//! PostgreSQL-backed `LocationRepository`.
//!
//! The address tuple carries a unique constraint, so a racing insert fails
//! with `StoreError::Duplicate` and the caller re-reads.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{LocationRepository, StoreError};
use crate::domain::{Address, LocationDetails, LocationId};

use super::diesel_helpers::{map_diesel_error, map_pool_error, map_row_error};
use super::models::NewLocationRow;
use super::pool::DbPool;
use super::schema::locations;

/// Diesel-backed location storage.
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Look up a location id by its full address on an open connection.
pub(crate) async fn find_location_id(
    conn: &mut AsyncPgConnection,
    address: &Address,
) -> Result<Option<i32>, diesel::result::Error> {
    locations::table
        .filter(locations::unit_number.eq(address.unit_number))
        .filter(locations::street.eq(address.street))
        .filter(locations::city.eq(&address.city))
        .filter(locations::state.eq(&address.state))
        .filter(locations::zipcode.eq(address.zipcode))
        .filter(locations::country.eq(&address.country))
        .select(locations::id)
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn find_by_address(&self, address: &Address) -> Result<Option<LocationId>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = find_location_id(&mut conn, address)
            .await
            .map_err(map_diesel_error)?;
        id.map(LocationId::new).transpose().map_err(map_row_error)
    }

    async fn insert(&self, details: &LocationDetails) -> Result<LocationId, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i32 = diesel::insert_into(locations::table)
            .values(NewLocationRow::from(details))
            .returning(locations::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        LocationId::new(id).map_err(map_row_error)
    }
}
