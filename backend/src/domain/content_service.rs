//! Content operations: document/page/gallery/image CRUD, aggregate
//! assembly, and ownership enforcement.
//!
//! Every operation authenticates against the owning document before
//! touching child rows — child ids supplied by the caller are never
//! trusted on their own.

use std::sync::Arc;

use tracing::{debug, info};

use super::access::ensure_document_owner;
use super::content::{
    AssembledDocument, AssembledGallery, Document, DocumentId, DocumentUpsert, Gallery, GalleryId,
    GalleryUpsert, Image, Page, PageId, DEFAULT_PAGE_CONTENT,
};
use super::error::Error;
use super::ports::{
    ContentPersistenceError, ContentRepository, ImageStore, ImageStoreError, StoredImage,
};
use super::references::{resolve_gallery_references, GalleryReference};
use super::user::UserId;

/// Result of a document upsert, distinguishing create from update for the
/// HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpsertOutcome {
    pub document: AssembledDocument,
    pub created: bool,
}

/// Content store façade handed to the HTTP layer.
#[derive(Clone)]
pub struct ContentService {
    content: Arc<dyn ContentRepository>,
    images: Arc<dyn ImageStore>,
}

fn map_content_error(error: ContentPersistenceError) -> Error {
    match error {
        ContentPersistenceError::Connection { message } => Error::service_unavailable(message),
        ContentPersistenceError::Query { message } => Error::internal(message),
        ContentPersistenceError::DuplicateName { name } => {
            Error::conflict(format!("gallery name already used: {name}"))
        }
        ContentPersistenceError::MissingParent { message } => Error::not_found(message),
    }
}

fn map_image_store_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::Write { message } | ImageStoreError::Remove { message } => {
            Error::internal(message)
        }
        ImageStoreError::InvalidFilename { message } => Error::invalid_request(message),
    }
}

impl ContentService {
    pub fn new(content: Arc<dyn ContentRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { content, images }
    }

    // Documents ------------------------------------------------------------

    /// Create a document for `caller` or retitle one they own. Returns the
    /// reassembled aggregate.
    pub async fn upsert_document(
        &self,
        caller: &UserId,
        request: DocumentUpsert,
    ) -> Result<DocumentUpsertOutcome, Error> {
        match request {
            DocumentUpsert::Create {
                title,
                with_default_page,
            } => {
                let document = self
                    .content
                    .insert_document(caller, &title, with_default_page)
                    .await
                    .map_err(map_content_error)?;
                info!(document_id = %document.id, owner = %caller, "created document");
                Ok(DocumentUpsertOutcome {
                    document: self.assemble(document).await?,
                    created: true,
                })
            }
            DocumentUpsert::Update { id, title } => {
                let document = self.owned_document(caller, &id).await?;
                self.content
                    .update_document_title(&document.id, &title)
                    .await
                    .map_err(map_content_error)?;
                let updated = Document { title, ..document };
                Ok(DocumentUpsertOutcome {
                    document: self.assemble(updated).await?,
                    created: false,
                })
            }
        }
    }

    /// Delete a document and, via cascade, its pages, galleries, and
    /// images. Deleting an absent id succeeds.
    pub async fn delete_document(&self, caller: &UserId, id: &DocumentId) -> Result<(), Error> {
        let existing = self
            .content
            .find_document(id)
            .await
            .map_err(map_content_error)?;
        let Some(document) = existing else {
            debug!(document_id = %id, "delete of absent document is a no-op");
            return Ok(());
        };
        ensure_document_owner(caller, &document)?;
        self.content
            .delete_document(id)
            .await
            .map_err(map_content_error)?;
        info!(document_id = %id, "deleted document");
        Ok(())
    }

    /// All documents owned by `caller` as bare summaries.
    pub async fn list_documents(&self, caller: &UserId) -> Result<Vec<Document>, Error> {
        self.content
            .documents_for_owner(caller)
            .await
            .map_err(map_content_error)
    }

    /// Fetch one owned document with pages and galleries assembled.
    pub async fn get_document(
        &self,
        caller: &UserId,
        id: &DocumentId,
    ) -> Result<AssembledDocument, Error> {
        let document = self.owned_document(caller, id).await?;
        self.assemble(document).await
    }

    // Galleries ------------------------------------------------------------

    /// Create a gallery in an owned document or rename an owned gallery.
    pub async fn upsert_gallery(
        &self,
        caller: &UserId,
        request: GalleryUpsert,
    ) -> Result<AssembledGallery, Error> {
        match request {
            GalleryUpsert::Create { document_id, name } => {
                self.owned_document(caller, &document_id).await?;
                let gallery = self
                    .content
                    .insert_gallery(&document_id, &name)
                    .await
                    .map_err(map_content_error)?;
                info!(gallery_id = %gallery.id, document_id = %document_id, "created gallery");
                self.assemble_gallery(gallery).await
            }
            GalleryUpsert::Update { id, name } => {
                let (gallery, _) = self.owned_gallery(caller, &id).await?;
                self.content
                    .rename_gallery(&gallery.id, &name)
                    .await
                    .map_err(map_content_error)?;
                self.assemble_gallery(Gallery { name, ..gallery }).await
            }
        }
    }

    /// Delete a gallery (cascading to its images) and return the owning
    /// document reassembled.
    pub async fn delete_gallery(
        &self,
        caller: &UserId,
        id: &GalleryId,
    ) -> Result<AssembledDocument, Error> {
        let (gallery, document) = self.owned_gallery(caller, id).await?;
        self.content
            .delete_gallery(&gallery.id)
            .await
            .map_err(map_content_error)?;
        info!(gallery_id = %id, document_id = %document.id, "deleted gallery");
        self.assemble(document).await
    }

    /// Fetch one owned gallery with its image paths.
    pub async fn get_gallery(
        &self,
        caller: &UserId,
        id: &GalleryId,
    ) -> Result<AssembledGallery, Error> {
        let (gallery, _) = self.owned_gallery(caller, id).await?;
        self.assemble_gallery(gallery).await
    }

    // Pages ----------------------------------------------------------------

    /// Append a page with the default placeholder body to an owned
    /// document.
    pub async fn create_page(
        &self,
        caller: &UserId,
        document_id: &DocumentId,
    ) -> Result<Page, Error> {
        self.owned_document(caller, document_id).await?;
        self.content
            .insert_page(document_id, DEFAULT_PAGE_CONTENT)
            .await
            .map_err(map_content_error)
    }

    /// Replace a page's content wholesale.
    pub async fn update_page(
        &self,
        caller: &UserId,
        page_id: &PageId,
        content: &str,
    ) -> Result<Page, Error> {
        self.owned_page(caller, page_id).await?;
        self.content
            .update_page_content(page_id, content)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| Error::not_found("page not found"))
    }

    /// Delete a page from an owned document and return the document
    /// reassembled. Deleting an absent page is a no-op; a page belonging to
    /// a different document is rejected.
    pub async fn delete_page(
        &self,
        caller: &UserId,
        document_id: &DocumentId,
        page_id: &PageId,
    ) -> Result<AssembledDocument, Error> {
        let document = self.owned_document(caller, document_id).await?;
        let page = self
            .content
            .find_page(page_id)
            .await
            .map_err(map_content_error)?;
        if let Some(page) = page {
            if page.document_id != *document_id {
                return Err(Error::invalid_request(
                    "page does not belong to the given document",
                ));
            }
            self.content
                .delete_page(page_id)
                .await
                .map_err(map_content_error)?;
            info!(page_id = %page_id, document_id = %document_id, "deleted page");
        }
        self.assemble(document).await
    }

    /// Resolve the `gallery(Name)` references of one owned page against the
    /// owning document's galleries, in order of appearance.
    pub async fn page_references(
        &self,
        caller: &UserId,
        page_id: &PageId,
    ) -> Result<Vec<GalleryReference>, Error> {
        let (page, document) = self.owned_page(caller, page_id).await?;
        let galleries = self.assembled_galleries(&document.id).await?;
        Ok(resolve_gallery_references(&page.content, &galleries))
    }

    // Images ---------------------------------------------------------------

    /// Store uploaded bytes and append the image to an owned gallery.
    ///
    /// The blob is written first; if the row insert then fails, the blob is
    /// removed again so the store does not accumulate orphans.
    pub async fn upload_image(
        &self,
        caller: &UserId,
        gallery_id: &GalleryId,
        original_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredImage, Error> {
        self.owned_gallery(caller, gallery_id).await?;
        let stored = self
            .images
            .save(original_filename, bytes)
            .await
            .map_err(map_image_store_error)?;

        let inserted = self
            .content
            .insert_image(gallery_id, &stored.public_path)
            .await;
        if let Err(error) = inserted {
            if let Err(cleanup) = self.images.remove(&stored.filename).await {
                tracing::warn!(
                    filename = %stored.filename,
                    error = %cleanup,
                    "failed to remove orphaned upload"
                );
            }
            return Err(map_content_error(error));
        }
        info!(gallery_id = %gallery_id, filename = %stored.filename, "stored image");
        Ok(stored)
    }

    /// Delete an image row by its upload filename and remove the stored
    /// file. Absent filenames are a no-op.
    pub async fn delete_image(&self, caller: &UserId, filename: &str) -> Result<(), Error> {
        let public_path = format!("/images/{filename}");
        let image = self
            .content
            .find_image_by_filename(&public_path)
            .await
            .map_err(map_content_error)?;
        let Some(image) = image else {
            debug!(%filename, "delete of absent image is a no-op");
            return Ok(());
        };
        self.owned_gallery(caller, &image.gallery_id).await?;
        self.content
            .delete_image_by_filename(&public_path)
            .await
            .map_err(map_content_error)?;
        self.images
            .remove(filename)
            .await
            .map_err(map_image_store_error)?;
        info!(%filename, "deleted image");
        Ok(())
    }

    // Assembly and ownership helpers ---------------------------------------

    /// Compose the transfer aggregate: document row, ordered pages, and
    /// galleries with their image paths. Re-reads the store on every call.
    async fn assemble(&self, document: Document) -> Result<AssembledDocument, Error> {
        let pages = self
            .content
            .pages_for_document(&document.id)
            .await
            .map_err(map_content_error)?;
        let galleries = self.assembled_galleries(&document.id).await?;
        Ok(AssembledDocument {
            document,
            pages,
            galleries,
        })
    }

    async fn assembled_galleries(
        &self,
        document_id: &DocumentId,
    ) -> Result<Vec<AssembledGallery>, Error> {
        let galleries = self
            .content
            .galleries_for_document(document_id)
            .await
            .map_err(map_content_error)?;
        let mut assembled = Vec::with_capacity(galleries.len());
        for gallery in galleries {
            assembled.push(self.assemble_gallery(gallery).await?);
        }
        Ok(assembled)
    }

    async fn assemble_gallery(&self, gallery: Gallery) -> Result<AssembledGallery, Error> {
        let images = self
            .content
            .images_for_gallery(&gallery.id)
            .await
            .map_err(map_content_error)?;
        let image_paths = images.into_iter().map(|Image { filename, .. }| filename).collect();
        Ok(AssembledGallery {
            gallery,
            image_paths,
        })
    }

    /// Fetch a document and require that `caller` owns it.
    async fn owned_document(
        &self,
        caller: &UserId,
        id: &DocumentId,
    ) -> Result<Document, Error> {
        let document = self
            .content
            .find_document(id)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| Error::not_found("document not found"))?;
        ensure_document_owner(caller, &document)?;
        Ok(document)
    }

    /// Fetch a gallery and re-derive ownership through its document.
    async fn owned_gallery(
        &self,
        caller: &UserId,
        id: &GalleryId,
    ) -> Result<(Gallery, Document), Error> {
        let gallery = self
            .content
            .find_gallery(id)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| Error::not_found("gallery not found"))?;
        let document = self.owned_document(caller, &gallery.document_id).await?;
        Ok((gallery, document))
    }

    /// Fetch a page and re-derive ownership through its document.
    async fn owned_page(&self, caller: &UserId, id: &PageId) -> Result<(Page, Document), Error> {
        let page = self
            .content
            .find_page(id)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| Error::not_found("page not found"))?;
        let document = self.owned_document(caller, &page.document_id).await?;
        Ok((page, document))
    }
}
