//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. They exist solely to satisfy Diesel's type requirements for
//! queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{galleries, images, markdown_documents, pages, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the markdown_documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = markdown_documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new document records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = markdown_documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub owner_id: Uuid,
}

/// Row struct for reading from the pages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PageRow {
    pub id: Uuid,
    pub content: String,
    pub markdown_document_id: Uuid,
    pub position: i32,
}

/// Insertable struct for creating new page records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pages)]
pub(crate) struct NewPageRow<'a> {
    pub id: Uuid,
    pub content: &'a str,
    pub markdown_document_id: Uuid,
    pub position: i32,
}

/// Row struct for reading from the galleries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = galleries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GalleryRow {
    pub id: Uuid,
    pub name: String,
    pub markdown_document_id: Uuid,
}

/// Insertable struct for creating new gallery records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = galleries)]
pub(crate) struct NewGalleryRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub markdown_document_id: Uuid,
}

/// Row struct for reading from the images table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ImageRow {
    pub id: Uuid,
    pub filename: String,
    pub gallery_id: Uuid,
    #[expect(dead_code, reason = "read back for ordering only")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new image records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = images)]
pub(crate) struct NewImageRow<'a> {
    pub id: Uuid,
    pub filename: &'a str,
    pub gallery_id: Uuid,
}
