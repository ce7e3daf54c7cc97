//! PostgreSQL persistence adapters.
//!
//! Implements the domain's repository ports on top of Diesel with async
//! connections pooled through bb8. The module is split into the connection
//! pool, the generated-style schema definitions, internal row structs, and
//! one adapter per port.

mod diesel_content_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_content_repository::DieselContentRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
