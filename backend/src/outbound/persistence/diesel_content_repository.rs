//! PostgreSQL-backed `ContentRepository` implementation using Diesel ORM.
//!
//! A thin adapter: it translates between Diesel row structs and domain
//! entities and maps database errors to [`ContentPersistenceError`].
//! Cascading deletes are delegated to the schema's foreign keys.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::content::{
    Document, DocumentId, DocumentTitle, Gallery, GalleryId, GalleryName, Image, ImageId, Page,
    PageId,
};
use crate::domain::ports::{ContentPersistenceError, ContentRepository};
use crate::domain::user::UserId;

use super::models::{
    DocumentRow, GalleryRow, ImageRow, NewDocumentRow, NewGalleryRow, NewImageRow, NewPageRow,
    PageRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{galleries, images, markdown_documents, pages};

/// Diesel-backed implementation of the `ContentRepository` port.
#[derive(Clone)]
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContentPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ContentPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ContentPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            ContentPersistenceError::missing_parent("referenced parent row does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ContentPersistenceError::connection("database connection error")
        }
        _ => ContentPersistenceError::query("database error"),
    }
}

/// Like [`map_diesel_error`], but turns a unique violation into
/// [`ContentPersistenceError::DuplicateName`] for gallery inserts/renames.
fn map_gallery_error(error: diesel::result::Error, name: &GalleryName) -> ContentPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    if matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    ) {
        ContentPersistenceError::duplicate_name(name.as_ref())
    } else {
        map_diesel_error(error)
    }
}

fn row_to_document(row: DocumentRow) -> Result<Document, ContentPersistenceError> {
    let title = DocumentTitle::new(row.title)
        .map_err(|err| ContentPersistenceError::query(format!("stored title invalid: {err}")))?;
    Ok(Document {
        id: DocumentId::from_uuid(row.id),
        title,
        owner_id: UserId::from_uuid(row.owner_id),
    })
}

fn row_to_page(row: PageRow) -> Page {
    Page {
        id: PageId::from_uuid(row.id),
        content: row.content,
        document_id: DocumentId::from_uuid(row.markdown_document_id),
        position: row.position,
    }
}

fn row_to_gallery(row: GalleryRow) -> Result<Gallery, ContentPersistenceError> {
    let name = GalleryName::new(row.name).map_err(|err| {
        ContentPersistenceError::query(format!("stored gallery name invalid: {err}"))
    })?;
    Ok(Gallery {
        id: GalleryId::from_uuid(row.id),
        name,
        document_id: DocumentId::from_uuid(row.markdown_document_id),
    })
}

fn row_to_image(row: ImageRow) -> Image {
    Image {
        id: ImageId::from_uuid(row.id),
        filename: row.filename,
        gallery_id: GalleryId::from_uuid(row.gallery_id),
    }
}

/// Insert a page at `max(position) + 1` within the document. Runs on the
/// caller's connection so it can take part in a transaction.
async fn insert_page_on(
    conn: &mut diesel_async::AsyncPgConnection,
    document: Uuid,
    content: &str,
) -> Result<PageRow, diesel::result::Error> {
    let max_position: Option<i32> = pages::table
        .filter(pages::markdown_document_id.eq(document))
        .select(diesel::dsl::max(pages::position))
        .first(conn)
        .await?;
    let position = max_position.map_or(0, |max| max + 1);

    let row = NewPageRow {
        id: Uuid::new_v4(),
        content,
        markdown_document_id: document,
        position,
    };
    diesel::insert_into(pages::table)
        .values(&row)
        .returning(PageRow::as_returning())
        .get_result(conn)
        .await
}

#[async_trait]
impl ContentRepository for DieselContentRepository {
    async fn insert_document(
        &self,
        owner: &UserId,
        title: &DocumentTitle,
        with_default_page: bool,
    ) -> Result<Document, ContentPersistenceError> {
        use crate::domain::content::DEFAULT_PAGE_CONTENT;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let document_id = Uuid::new_v4();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(markdown_documents::table)
                    .values(NewDocumentRow {
                        id: document_id,
                        title: title.as_ref(),
                        owner_id: *owner.as_uuid(),
                    })
                    .execute(conn)
                    .await?;
                if with_default_page {
                    insert_page_on(conn, document_id, DEFAULT_PAGE_CONTENT).await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        Ok(Document {
            id: DocumentId::from_uuid(document_id),
            title: title.clone(),
            owner_id: *owner,
        })
    }

    async fn update_document_title(
        &self,
        id: &DocumentId,
        title: &DocumentTitle,
    ) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(markdown_documents::table.find(id.as_uuid()))
            .set(markdown_documents::title.eq(title.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(markdown_documents::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_document(
        &self,
        id: &DocumentId,
    ) -> Result<Option<Document>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DocumentRow> = markdown_documents::table
            .find(id.as_uuid())
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_document).transpose()
    }

    async fn documents_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Document>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DocumentRow> = markdown_documents::table
            .filter(markdown_documents::owner_id.eq(owner.as_uuid()))
            .order(markdown_documents::created_at.asc())
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_document).collect()
    }

    async fn insert_page(
        &self,
        document: &DocumentId,
        content: &str,
    ) -> Result<Page, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let document = *document.as_uuid();

        // Transactional so the position read and the insert are atomic.
        let row = conn
            .transaction(|conn| insert_page_on(conn, document, content).scope_boxed())
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_page(row))
    }

    async fn update_page_content(
        &self,
        page: &PageId,
        content: &str,
    ) -> Result<Option<Page>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PageRow> = diesel::update(pages::table.find(page.as_uuid()))
            .set(pages::content.eq(content))
            .returning(PageRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_page))
    }

    async fn delete_page(&self, page: &PageId) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(pages::table.find(page.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_page(&self, page: &PageId) -> Result<Option<Page>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PageRow> = pages::table
            .find(page.as_uuid())
            .select(PageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_page))
    }

    async fn pages_for_document(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<Page>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PageRow> = pages::table
            .filter(pages::markdown_document_id.eq(document.as_uuid()))
            .order(pages::position.asc())
            .select(PageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_page).collect())
    }

    async fn insert_gallery(
        &self,
        document: &DocumentId,
        name: &GalleryName,
    ) -> Result<Gallery, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = Uuid::new_v4();
        diesel::insert_into(galleries::table)
            .values(NewGalleryRow {
                id,
                name: name.as_ref(),
                markdown_document_id: *document.as_uuid(),
            })
            .execute(&mut conn)
            .await
            .map_err(|err| map_gallery_error(err, name))?;
        Ok(Gallery {
            id: GalleryId::from_uuid(id),
            name: name.clone(),
            document_id: *document,
        })
    }

    async fn rename_gallery(
        &self,
        id: &GalleryId,
        name: &GalleryName,
    ) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(galleries::table.find(id.as_uuid()))
            .set(galleries::name.eq(name.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_gallery_error(err, name))?;
        Ok(updated > 0)
    }

    async fn delete_gallery(&self, id: &GalleryId) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(galleries::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_gallery(
        &self,
        id: &GalleryId,
    ) -> Result<Option<Gallery>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GalleryRow> = galleries::table
            .find(id.as_uuid())
            .select(GalleryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_gallery).transpose()
    }

    async fn galleries_for_document(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<Gallery>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GalleryRow> = galleries::table
            .filter(galleries::markdown_document_id.eq(document.as_uuid()))
            .order(galleries::name.asc())
            .select(GalleryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_gallery).collect()
    }

    async fn insert_image(
        &self,
        gallery: &GalleryId,
        filename: &str,
    ) -> Result<Image, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ImageRow = diesel::insert_into(images::table)
            .values(NewImageRow {
                id: Uuid::new_v4(),
                filename,
                gallery_id: *gallery.as_uuid(),
            })
            .returning(ImageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_image(row))
    }

    async fn delete_image_by_filename(
        &self,
        filename: &str,
    ) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(images::table.filter(images::filename.eq(filename)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_image_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<Image>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ImageRow> = images::table
            .filter(images::filename.eq(filename))
            .select(ImageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_image))
    }

    async fn images_for_gallery(
        &self,
        gallery: &GalleryId,
    ) -> Result<Vec<Image>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ImageRow> = images::table
            .filter(images::gallery_id.eq(gallery.as_uuid()))
            .order((images::created_at.asc(), images::id.asc()))
            .select(ImageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_image).collect())
    }
}
