//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod documents;
pub mod error;
pub mod galleries;
pub mod health;
pub mod images;
pub mod pages;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_fixtures;
pub mod users;

pub use error::ApiResult;
pub use state::HttpState;
