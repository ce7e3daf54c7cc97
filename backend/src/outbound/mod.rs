//! Outbound adapters implementing the domain ports.

pub mod blobstore;
pub mod credentials;
pub mod persistence;
