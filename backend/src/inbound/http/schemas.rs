//! Wire DTOs shared across the content endpoints.
//!
//! Field names follow the client's camelCase conventions; conversion from
//! the domain aggregates happens here so handlers stay declarative.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::content::{AssembledDocument, AssembledGallery, Document, Page};
use crate::domain::references::{GalleryReference, ReferenceTarget};
use crate::domain::{DocumentId, GalleryId, PageId, UserId};

/// Body of the fixed success envelope (`{"status":"success"}`).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub status: String,
}

impl SuccessResponse {
    pub fn new() -> Self {
        Self {
            status: "success".to_owned(),
        }
    }
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of a document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageDto {
    pub id: PageId,
    pub content: String,
    pub position: i32,
}

impl From<Page> for PageDto {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            content: page.content,
            position: page.position,
        }
    }
}

/// A gallery with its ordered image paths.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryDto {
    pub id: GalleryId,
    pub name: String,
    pub image_paths: Vec<String>,
    pub markdown_document_id: DocumentId,
}

impl From<AssembledGallery> for GalleryDto {
    fn from(assembled: AssembledGallery) -> Self {
        Self {
            id: assembled.gallery.id,
            name: assembled.gallery.name.into(),
            image_paths: assembled.image_paths,
            markdown_document_id: assembled.gallery.document_id,
        }
    }
}

/// A document with its pages and galleries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDto {
    pub id: DocumentId,
    pub title: String,
    pub pages: Vec<PageDto>,
    pub galleries: Vec<GalleryDto>,
    pub owner_id: UserId,
}

impl From<AssembledDocument> for DocumentDto {
    fn from(assembled: AssembledDocument) -> Self {
        Self {
            id: assembled.document.id,
            title: assembled.document.title.into(),
            pages: assembled.pages.into_iter().map(PageDto::from).collect(),
            galleries: assembled
                .galleries
                .into_iter()
                .map(GalleryDto::from)
                .collect(),
            owner_id: assembled.document.owner_id,
        }
    }
}

impl From<Document> for DocumentDto {
    /// Summary form: the bare row with empty `pages` and `galleries`.
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            title: document.title.into(),
            pages: Vec::new(),
            galleries: Vec::new(),
            owner_id: document.owner_id,
        }
    }
}

/// One resolved or unresolved `gallery(Name)` token of a page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryReferenceDto {
    /// Byte offset of the token within the page content.
    pub offset: usize,
    pub name: String,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_id: Option<GalleryId>,
}

impl From<GalleryReference> for GalleryReferenceDto {
    fn from(reference: GalleryReference) -> Self {
        let gallery_id = match reference.target {
            ReferenceTarget::Resolved { gallery_id } => Some(gallery_id),
            ReferenceTarget::Unresolved => None,
        };
        Self {
            offset: reference.offset,
            name: reference.name,
            resolved: gallery_id.is_some(),
            gallery_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::domain::content::{DocumentTitle, Gallery, GalleryName};

    #[test]
    fn document_dto_uses_camel_case_wire_names() {
        let assembled = AssembledDocument {
            document: Document {
                id: DocumentId::random(),
                title: DocumentTitle::new("Notes").expect("valid title"),
                owner_id: UserId::random(),
            },
            pages: vec![Page {
                id: PageId::random(),
                content: "# Hello".into(),
                document_id: DocumentId::random(),
                position: 0,
            }],
            galleries: vec![AssembledGallery {
                gallery: Gallery {
                    id: GalleryId::random(),
                    name: GalleryName::new("Pets").expect("valid name"),
                    document_id: DocumentId::random(),
                },
                image_paths: vec!["/images/1-a.jpg".into()],
            }],
        };

        let value = serde_json::to_value(DocumentDto::from(assembled)).expect("serialise");
        assert!(value.get("ownerId").is_some());
        assert!(value.get("owner_id").is_none());
        let gallery = &value["galleries"][0];
        assert!(gallery.get("imagePaths").is_some());
        assert!(gallery.get("markdownDocumentId").is_some());
    }

    #[test]
    fn summary_dto_has_empty_children() {
        let document = Document {
            id: DocumentId::random(),
            title: DocumentTitle::new("Notes").expect("valid title"),
            owner_id: UserId::random(),
        };
        let value = serde_json::to_value(DocumentDto::from(document)).expect("serialise");
        assert_eq!(value["pages"], Value::Array(Vec::new()));
        assert_eq!(value["galleries"], Value::Array(Vec::new()));
    }
}
