//! Domain entities, services, and ports.
//!
//! Types are strongly validated at construction and transport agnostic;
//! inbound adapters translate them to and from wire DTOs, outbound adapters
//! implement the port traits.

pub mod access;
pub mod accounts_service;
pub mod content;
pub mod content_service;
pub mod error;
pub mod ports;
pub mod references;
pub mod user;
pub mod welcome;

#[cfg(test)]
mod content_service_tests;

pub use self::accounts_service::{AccountService, LoginOutcome};
pub use self::content::{
    AssembledDocument, AssembledGallery, Document, DocumentId, DocumentTitle, DocumentUpsert,
    Gallery, GalleryId, GalleryName, GalleryUpsert, Image, ImageId, Page, PageId,
};
pub use self::content_service::{ContentService, DocumentUpsertOutcome};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::references::{resolve_gallery_references, GalleryReference, ReferenceTarget};
pub use self::user::{User, UserId, Username};

/// Convenient domain result alias.
pub type DomainResult<T> = Result<T, Error>;
