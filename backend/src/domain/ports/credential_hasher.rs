//! Port for one-way password hashing.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashers.
    pub enum CredentialHashError {
        /// The stored hash could not be parsed.
        InvalidHashFormat { message: String } => "stored password hash is malformed: {message}",
        /// Hashing failed (bad parameters, worker crashed).
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted one-way hash with verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    async fn hash(&self, password: &str) -> Result<String, CredentialHashError>;

    /// Check `password` against a stored hash. A mismatch is `Ok(false)`.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHashError>;
}

impl From<CredentialHashError> for crate::domain::Error {
    fn from(value: CredentialHashError) -> Self {
        tracing::error!(error = %value, "credential hashing failed");
        Self::internal(value.to_string())
    }
}
