//! Customer accounts: registration input, login credentials, stored records.

use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::ids::{CustomerId, LocationId};
use super::location::LocationDetails;

/// Validation failures for account input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl AccountValidationError {
    /// Request field that failed validation.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

fn normalise_email(email: &str) -> Result<String, AccountValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(AccountValidationError::EmptyEmail);
    }
    Ok(trimmed.to_owned())
}

fn checked_password(password: &str) -> Result<Zeroizing<String>, AccountValidationError> {
    if password.is_empty() {
        return Err(AccountValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Email and password presented at login.
///
/// The password is zeroed on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginCredentials {
    /// Validate raw login input.
    ///
    /// ```
    /// use shems::domain::LoginCredentials;
    ///
    /// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "secret").unwrap();
    /// assert_eq!(creds.email(), "ada@example.com");
    /// assert!(LoginCredentials::try_from_parts("", "secret").is_err());
    /// ```
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AccountValidationError> {
        Ok(Self {
            email: normalise_email(email)?,
            password: checked_password(password)?,
        })
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Plain-text password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Personal details supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRegistration {
    profile: CustomerProfile,
    credentials: LoginCredentials,
    billing_location: LocationDetails,
}

impl CustomerRegistration {
    /// Validate registration input.
    pub fn try_new(
        profile: CustomerProfile,
        email: &str,
        password: &str,
        billing_location: LocationDetails,
    ) -> Result<Self, AccountValidationError> {
        Ok(Self {
            profile,
            credentials: LoginCredentials::try_from_parts(email, password)?,
            billing_location,
        })
    }

    /// Personal details.
    #[must_use]
    pub fn profile(&self) -> &CustomerProfile {
        &self.profile
    }

    /// Email and password.
    #[must_use]
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Billing address and dwelling attributes.
    #[must_use]
    pub fn billing_location(&self) -> &LocationDetails {
        &self.billing_location
    }
}

/// Customer record as returned to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub billing_address_id: LocationId,
}

/// Customer row together with its stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCustomer {
    pub customer: Customer,
    pub password_hash: String,
}

/// Insert payload for a new customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub profile: CustomerProfile,
    pub email: String,
    pub billing_address_id: LocationId,
    pub password_hash: String,
}
