//! JWT bearer-token adapter.
//!
//! Issues HS256-signed tokens carrying the user id as `sub` and an expiry
//! one validity window out. Verification distinguishes expiry from every
//! other failure so the API can report it precisely.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenClaims, TokenError, TokenService, TOKEN_VALIDITY};
use crate::domain::user::UserId;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: u64,
    exp: u64,
}

/// Token service backed by HS256-signed JWTs.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtTokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }
}

fn unix_now() -> u64 {
    #[expect(
        clippy::cast_sign_loss,
        reason = "current time is always after the epoch"
    )]
    let now = chrono::Utc::now().timestamp() as u64;
    now
}

#[async_trait]
impl TokenService for JwtTokenService {
    async fn issue(&self, user_id: &UserId) -> Result<String, TokenError> {
        let issued_at = unix_now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_VALIDITY.as_secs(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenError::issuance(err.to_string()))
    }

    async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|err| {
                match err.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::expired(),
                    _ => TokenError::invalid(),
                }
            })?;
        let user_id = data.claims.sub.parse().map_err(|_| TokenError::invalid())?;
        Ok(TokenClaims { user_id })
    }
}
