//! Port for customer persistence.

use async_trait::async_trait;

use crate::domain::{Customer, NewCustomer, StoredCustomer};

use super::StoreError;

/// Customer storage. Emails are unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Look up a customer and their password hash by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredCustomer>, StoreError>;

    /// Insert a customer.
    ///
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, StoreError>;
}
