//! PostgreSQL-backed `CustomerRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CustomerRepository, StoreError};
use crate::domain::{Customer, NewCustomer, StoredCustomer};

use super::diesel_helpers::{map_diesel_error, map_pool_error, map_row_error};
use super::models::{CustomerRow, NewCustomerRow};
use super::pool::DbPool;
use super::schema::customers;

/// Diesel-backed customer storage.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredCustomer>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CustomerRow> = customers::table
            .filter(customers::email.eq(email))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(StoredCustomer::try_from)
            .transpose()
            .map_err(map_row_error)
    }

    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCustomerRow {
            first_name: &customer.profile.first_name,
            last_name: &customer.profile.last_name,
            phone_number: &customer.profile.phone_number,
            email: &customer.email,
            billing_address_id: customer.billing_address_id.get(),
            password_hash: &customer.password_hash,
        };
        let stored: CustomerRow = diesel::insert_into(customers::table)
            .values(&row)
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        StoredCustomer::try_from(stored)
            .map(|stored| stored.customer)
            .map_err(map_row_error)
    }
}
