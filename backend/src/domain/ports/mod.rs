//! Port traits the domain depends on, implemented by outbound adapters.

mod macros;

pub mod content_repository;
pub mod image_store;
pub mod password_hasher;
pub mod token_service;
pub mod user_repository;

pub use content_repository::{ContentPersistenceError, ContentRepository};
pub use image_store::{ImageStore, ImageStoreError, StoredImage};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use token_service::{TokenClaims, TokenError, TokenService, TOKEN_VALIDITY};
pub use user_repository::{NewAccount, UserPersistenceError, UserRepository};
