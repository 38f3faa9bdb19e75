//! Argon2id implementation of `CredentialHasher`.
//!
//! Hashes are PHC strings, so the salt and cost parameters travel with the
//! hash and verification does not depend on the current configuration.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Cost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Cost {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

/// Password hasher running Argon2id on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Argon2CredentialHasher {
    /// Build a hasher with the given cost.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialHashError::Hashing`] when the parameters are
    /// outside what Argon2 accepts (for example memory below `8 * parallelism`).
    pub fn new(cost: Argon2Cost) -> Result<Self, CredentialHashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|err| CredentialHashError::hashing(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn join_error(err: tokio::task::JoinError) -> CredentialHashError {
    CredentialHashError::hashing(format!("hashing task failed: {err}"))
}

fn verify_blocking(password: &[u8], hash: &str) -> Result<bool, CredentialHashError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| CredentialHashError::invalid_hash_format(err.to_string()))?;
    match Argon2::default().verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialHashError::hashing(err.to_string())),
    }
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &str) -> Result<String, CredentialHashError> {
        let argon2 = self.argon2();
        let password = Zeroizing::new(password.as_bytes().to_vec());
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(&password, &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| CredentialHashError::hashing(err.to_string()))
        })
        .await
        .map_err(join_error)?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHashError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
            .await
            .map_err(join_error)?
    }
}
