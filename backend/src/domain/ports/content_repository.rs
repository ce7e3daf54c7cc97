//! Port abstraction for the content store: documents, pages, galleries,
//! and images.
//!
//! The repository exposes row-level primitives; aggregate assembly and
//! ownership checks live in [`crate::domain::content_service`]. Parent
//! references are enforced by cascading foreign keys, so deletes only need
//! to target the row itself.

use async_trait::async_trait;

use crate::domain::content::{
    Document, DocumentId, DocumentTitle, Gallery, GalleryId, GalleryName, Image, Page, PageId,
};
use crate::domain::user::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by content repository adapters.
    pub enum ContentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "content repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "content repository query failed: {message}",
        /// A gallery with this name already exists in the document.
        DuplicateName { name: String } => "gallery name already used in this document: {name}",
        /// An insert referenced a parent row that does not exist.
        MissingParent { message: String } => "parent row missing: {message}",
    }
}

#[async_trait]
pub trait ContentRepository: Send + Sync {
    // Documents ------------------------------------------------------------

    /// Insert a document, optionally seeding one default page in the same
    /// transaction. Returns the new document.
    async fn insert_document(
        &self,
        owner: &UserId,
        title: &DocumentTitle,
        with_default_page: bool,
    ) -> Result<Document, ContentPersistenceError>;

    /// Replace a document's title. Returns `false` when the id is unknown.
    async fn update_document_title(
        &self,
        id: &DocumentId,
        title: &DocumentTitle,
    ) -> Result<bool, ContentPersistenceError>;

    /// Delete a document; cascades to pages, galleries, and images.
    /// Deleting an absent id is a successful no-op.
    async fn delete_document(&self, id: &DocumentId) -> Result<(), ContentPersistenceError>;

    /// Fetch a single document row.
    async fn find_document(
        &self,
        id: &DocumentId,
    ) -> Result<Option<Document>, ContentPersistenceError>;

    /// All documents owned by `owner`, without children.
    async fn documents_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Document>, ContentPersistenceError>;

    // Pages ----------------------------------------------------------------

    /// Insert a page with the given content at the next free position.
    async fn insert_page(
        &self,
        document: &DocumentId,
        content: &str,
    ) -> Result<Page, ContentPersistenceError>;

    /// Replace a page's content wholesale. Returns the updated page, or
    /// `None` when the id is unknown.
    async fn update_page_content(
        &self,
        page: &PageId,
        content: &str,
    ) -> Result<Option<Page>, ContentPersistenceError>;

    /// Delete a page; absent ids are a successful no-op.
    async fn delete_page(&self, page: &PageId) -> Result<(), ContentPersistenceError>;

    /// Fetch a single page row.
    async fn find_page(&self, page: &PageId) -> Result<Option<Page>, ContentPersistenceError>;

    /// Pages of a document ordered by position.
    async fn pages_for_document(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<Page>, ContentPersistenceError>;

    // Galleries ------------------------------------------------------------

    /// Insert a gallery. A name collision within the document maps to
    /// [`ContentPersistenceError::DuplicateName`].
    async fn insert_gallery(
        &self,
        document: &DocumentId,
        name: &GalleryName,
    ) -> Result<Gallery, ContentPersistenceError>;

    /// Rename a gallery. Returns `false` when the id is unknown.
    async fn rename_gallery(
        &self,
        id: &GalleryId,
        name: &GalleryName,
    ) -> Result<bool, ContentPersistenceError>;

    /// Delete a gallery; cascades to images. Absent ids are a no-op.
    async fn delete_gallery(&self, id: &GalleryId) -> Result<(), ContentPersistenceError>;

    /// Fetch a single gallery row.
    async fn find_gallery(
        &self,
        id: &GalleryId,
    ) -> Result<Option<Gallery>, ContentPersistenceError>;

    /// Galleries of a document.
    async fn galleries_for_document(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<Gallery>, ContentPersistenceError>;

    // Images ---------------------------------------------------------------

    /// Append an image row to a gallery.
    async fn insert_image(
        &self,
        gallery: &GalleryId,
        filename: &str,
    ) -> Result<Image, ContentPersistenceError>;

    /// Delete an image by its stored filename; absent names are a no-op.
    async fn delete_image_by_filename(
        &self,
        filename: &str,
    ) -> Result<(), ContentPersistenceError>;

    /// Fetch an image row by its stored filename.
    async fn find_image_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<Image>, ContentPersistenceError>;

    /// Images of a gallery in insertion order.
    async fn images_for_gallery(
        &self,
        gallery: &GalleryId,
    ) -> Result<Vec<Image>, ContentPersistenceError>;
}
