//! Capability port for bearer-token issuance and verification.
//!
//! Tokens encode the holder's user id and an expiry; the wire format is an
//! adapter concern (the production adapter signs JWTs).

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::user::UserId;

use super::macros::define_port_error;

/// Validity window for issued tokens.
pub const TOKEN_VALIDITY: Duration = Duration::from_secs(24 * 60 * 60);

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// The token is malformed or its signature does not verify.
        Invalid => "token is invalid",
        /// The token verified but its validity window has passed.
        Expired => "token has expired",
        /// The adapter could not issue a token.
        Issuance { message: String } => "token issuance failed: {message}",
    }
}

/// Verified claims carried by a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
}

#[async_trait]
pub trait TokenService: Send + Sync {
    /// Issue a token for `user_id` valid for [`TOKEN_VALIDITY`].
    async fn issue(&self, user_id: &UserId) -> Result<String, TokenError>;

    /// Verify a presented token and return its claims.
    async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
