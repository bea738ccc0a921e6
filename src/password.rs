//! Password Hashing
//!
//! Argon2id hashing for passwords at rest. Hashes are PHC strings, so
//! verification reads the salt and cost parameters from the stored value.

use crate::config::AuthConfig;
use crate::error::AuthError;

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Input for the placeholder hash used when a login names no known user
const DUMMY_PASSWORD: &str = "student-bank-dummy-password";

/// Salted one-way password hasher
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Build a hasher from the configured Argon2 costs
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.argon2_memory_cost,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AuthError::Config(format!("Invalid Argon2 parameters: {}", e)))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(DUMMY_PASSWORD.as_bytes(), &salt)?
            .to_string();

        Ok(Self { argon2, dummy_hash })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `Ok(false)`. A stored value that is not a valid PHC
    /// string is an internal error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            tracing::error!("Stored password hash is malformed: {:?}", e);
            AuthError::Internal
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify against a placeholder hash with the configured costs
    ///
    /// Costs the same as a real verification, so a login for an unknown
    /// user takes as long as one with a wrong password.
    pub fn verify_dummy(&self, password: &str) -> Result<bool, AuthError> {
        self.verify(password, &self.dummy_hash)
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_blocking(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.clone();
        let password = password.to_owned();
        run_blocking(move || hasher.hash(&password)).await
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        run_blocking(move || hasher.verify(&password, &hash)).await
    }

    /// [`verify_dummy`](Self::verify_dummy) on the blocking thread pool
    pub async fn verify_dummy_blocking(&self, password: &str) -> Result<bool, AuthError> {
        let hasher = self.clone();
        let password = password.to_owned();
        run_blocking(move || hasher.verify_dummy(&password)).await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("Password hashing task failed: {:?}", e);
        AuthError::Internal
    })?
}
