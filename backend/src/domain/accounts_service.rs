//! Account registration and login orchestrated over the credential ports.

use std::sync::Arc;

use tracing::{info, warn};

use super::error::Error;
use super::ports::{
    NewAccount, PasswordHashError, PasswordHasher, TokenError, TokenService, UserPersistenceError,
    UserRepository,
};
use super::user::{UserId, Username};
use super::welcome::WelcomeSeed;

/// Successful login payload: the bearer token plus the echoing username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub username: Username,
}

/// Registers accounts and issues bearer credentials.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateUsername { .. } => Error::conflict("username already taken"),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    let PasswordHashError::Hashing { message } = error;
    Error::internal(message)
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Invalid => Error::unauthorized("invalid credentials"),
        TokenError::Expired => Error::unauthorized("token has expired"),
        TokenError::Issuance { message } => Error::internal(message),
    }
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new account and seed its welcome content.
    ///
    /// The user row and the welcome document, pages, gallery, and images are
    /// committed in one repository transaction, so a failure partway leaves
    /// no partial account.
    pub async fn register(&self, username: Username, password: &str) -> Result<UserId, Error> {
        if password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }

        let password_hash = self.hasher.hash(password).await.map_err(map_hash_error)?;
        let account = NewAccount {
            username: username.clone(),
            password_hash,
        };
        let user = self
            .users
            .create_account(account, &WelcomeSeed::standard())
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %user.id, %username, "registered new account");
        Ok(user.id)
    }

    /// Verify credentials and issue a 24-hour bearer token.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller.
    pub async fn login(&self, username: Username, password: &str) -> Result<LoginOutcome, Error> {
        let user = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_persistence_error)?;

        let Some(user) = user else {
            warn!(%username, "login attempt for unknown username");
            return Err(Error::unauthorized("invalid credentials"));
        };

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized("invalid credentials"));
        }

        let token = self
            .tokens
            .issue(&user.id)
            .await
            .map_err(map_token_error)?;
        Ok(LoginOutcome {
            token,
            username: user.username,
        })
    }
}
