//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take [`AuthenticatedUser`] as an extractor argument; requests
//! without a valid `Authorization: Bearer` credential are rejected with 401
//! before the handler body runs.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::TokenError;
use crate::domain::{Error, UserId};

use super::state::HttpState;

/// Identity extracted from the request's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Invalid => Error::unauthorized("invalid bearer token"),
        TokenError::Expired => Error::unauthorized("bearer token has expired"),
        TokenError::Issuance { message } => Error::internal(message),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state = state
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let claims = state
                .tokens
                .verify(&token)
                .await
                .map_err(map_token_error)?;
            Ok(Self(claims.user_id))
        })
    }
}
