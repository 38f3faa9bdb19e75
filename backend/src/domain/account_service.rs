//! Customer registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::location_resolution::resolve_location;
use super::ports::{
    AccountCommand, CredentialHasher, CustomerRepository, LocationRepository, StoreError,
};
use super::{Customer, CustomerRegistration, Error, LoginCredentials, NewCustomer};

fn email_taken() -> Error {
    Error::conflict("User with same email already exists")
        .with_details(json!({ "field": "email", "code": "duplicate_email" }))
}

/// Account service over customer and location repositories.
#[derive(Clone)]
pub struct AccountService<C, L, H> {
    customers: Arc<C>,
    locations: Arc<L>,
    hasher: Arc<H>,
}

impl<C, L, H> AccountService<C, L, H> {
    /// Create the service.
    pub fn new(customers: Arc<C>, locations: Arc<L>, hasher: Arc<H>) -> Self {
        Self {
            customers,
            locations,
            hasher,
        }
    }
}

#[async_trait]
impl<C, L, H> AccountCommand for AccountService<C, L, H>
where
    C: CustomerRepository,
    L: LocationRepository,
    H: CredentialHasher,
{
    async fn register(&self, registration: CustomerRegistration) -> Result<Customer, Error> {
        let credentials = registration.credentials();
        if self
            .customers
            .find_by_email(credentials.email())
            .await?
            .is_some()
        {
            return Err(email_taken());
        }

        let password_hash = self.hasher.hash(credentials.password()).await?;
        let billing_address_id =
            resolve_location(self.locations.as_ref(), registration.billing_location()).await?;

        let new_customer = NewCustomer {
            profile: registration.profile().clone(),
            email: credentials.email().to_owned(),
            billing_address_id,
            password_hash,
        };
        let customer = match self.customers.insert(&new_customer).await {
            Ok(customer) => customer,
            Err(StoreError::Duplicate { .. }) => return Err(email_taken()),
            Err(other) => return Err(other.into()),
        };
        info!(customer_id = %customer.id, "customer registered");
        Ok(customer)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<Customer, Error> {
        let Some(stored) = self.customers.find_by_email(credentials.email()).await? else {
            return Err(Error::not_found("User does not exist"));
        };
        if !self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await?
        {
            return Err(Error::unauthorized("Invalid password"));
        }
        info!(customer_id = %stored.customer.id, "customer logged in");
        Ok(stored.customer)
    }
}
