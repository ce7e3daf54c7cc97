//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Argon2-encoded password hash.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Markdown documents, each owned by a user.
    markdown_documents (id) {
        id -> Uuid,
        title -> Varchar,
        /// Owning user; cascades on user deletion.
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pages of a document, ordered by `position`.
    pages (id) {
        id -> Uuid,
        content -> Text,
        /// Owning document; cascades on document deletion.
        markdown_document_id -> Uuid,
        /// Explicit ordering key within the document.
        position -> Int4,
    }
}

diesel::table! {
    /// Image galleries; `(markdown_document_id, name)` is unique.
    galleries (id) {
        id -> Uuid,
        name -> Varchar,
        /// Owning document; cascades on document deletion.
        markdown_document_id -> Uuid,
    }
}

diesel::table! {
    /// Uploaded images; `filename` stores the public path.
    images (id) {
        id -> Uuid,
        filename -> Varchar,
        /// Owning gallery; cascades on gallery deletion.
        gallery_id -> Uuid,
        /// Insertion timestamp; images are listed in this order.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(markdown_documents -> users (owner_id));
diesel::joinable!(pages -> markdown_documents (markdown_document_id));
diesel::joinable!(galleries -> markdown_documents (markdown_document_id));
diesel::joinable!(images -> galleries (gallery_id));

diesel::allow_tables_to_appear_in_same_query!(users, markdown_documents, pages, galleries, images);
