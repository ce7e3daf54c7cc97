//! Argon2id password hashing adapter.
//!
//! Hashing and verification run on the blocking thread pool because Argon2
//! is deliberately CPU- and memory-intensive.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash as EncodedHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use async_trait::async_trait;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::user::PasswordHash;

/// Password hasher backed by Argon2id with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

fn task_error(err: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hashing(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, cleartext: &str) -> Result<PasswordHash, PasswordHashError> {
        let cleartext = cleartext.to_owned();
        let encoded = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(cleartext.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        })
        .await
        .map_err(task_error)?
        .map_err(|err| PasswordHashError::hashing(err.to_string()))?;

        PasswordHash::new(encoded).map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    async fn verify(
        &self,
        cleartext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let cleartext = cleartext.to_owned();
        let encoded = hash.as_str().to_owned();

        tokio::task::spawn_blocking(move || {
            let parsed = EncodedHash::new(&encoded).map_err(|err| {
                PasswordHashError::hashing(format!("stored hash unreadable: {err}"))
            })?;
            match Argon2::default().verify_password(cleartext.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(err) => Err(PasswordHashError::hashing(err.to_string())),
            }
        })
        .await
        .map_err(task_error)?
    }
}
