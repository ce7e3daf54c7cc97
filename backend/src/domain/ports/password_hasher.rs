//! Capability port for password hashing and verification.
//!
//! The domain treats credential mechanics as an external capability: it
//! stores opaque [`PasswordHash`] values and delegates hashing and
//! comparison to the adapter.

use async_trait::async_trait;

use crate::domain::user::PasswordHash;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not be performed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a cleartext password into an opaque encoded form.
    async fn hash(&self, cleartext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check a cleartext candidate against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; `Err` is reserved for adapter failures
    /// such as a corrupt stored hash.
    async fn verify(
        &self,
        cleartext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError>;
}
