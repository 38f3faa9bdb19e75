//! Driving port for customer registration and login.

use async_trait::async_trait;

use crate::domain::{Customer, CustomerRegistration, Error, LoginCredentials};

/// Account use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a customer, reusing an existing location for the billing
    /// address when one matches.
    ///
    /// # Errors
    ///
    /// [`crate::domain::ErrorCode::Conflict`] when the email is registered.
    async fn register(&self, registration: CustomerRegistration) -> Result<Customer, Error>;

    /// Verify credentials.
    ///
    /// # Errors
    ///
    /// [`crate::domain::ErrorCode::NotFound`] for an unknown email and
    /// [`crate::domain::ErrorCode::Unauthorized`] for a wrong password.
    async fn login(&self, credentials: LoginCredentials) -> Result<Customer, Error>;
}
