//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::user::{PasswordHash, User, UserId, Username};
use crate::domain::welcome::WelcomeSeed;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username already taken: {username}",
    }
}

/// A new account prior to insertion.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub password_hash: PasswordHash,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user row and seed its welcome content in one transaction.
    ///
    /// Either the account plus the whole welcome document (pages, gallery,
    /// images) exists afterwards, or nothing does. A taken username maps to
    /// [`UserPersistenceError::DuplicateUsername`].
    async fn create_account(
        &self,
        account: NewAccount,
        welcome: &WelcomeSeed,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
