//! Content entities: documents, pages, galleries, and images.
//!
//! These are the persistence-backed aggregates the REST surface exposes.
//! Assembled variants carry child collections and are what goes over the
//! wire; bare variants mirror single rows.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(
    /// Identifier of a markdown document.
    DocumentId
);
define_id!(
    /// Identifier of a page within a document.
    PageId
);
define_id!(
    /// Identifier of a gallery within a document.
    GalleryId
);
define_id!(
    /// Identifier of an uploaded image.
    ImageId
);

/// Validation errors raised by the content newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyGalleryName,
    GalleryNameTooLong { max: usize },
}

impl fmt::Display for ContentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "document title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "document title must be at most {max} characters")
            }
            Self::EmptyGalleryName => write!(f, "gallery name must not be empty"),
            Self::GalleryNameTooLong { max } => {
                write!(f, "gallery name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ContentValidationError {}

/// Maximum allowed length for a document title.
pub const TITLE_MAX: usize = 256;
/// Maximum allowed length for a gallery name.
pub const GALLERY_NAME_MAX: usize = 128;

/// Validated title of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentTitle(String);

impl DocumentTitle {
    /// Validate and construct a [`DocumentTitle`].
    pub fn new(title: impl Into<String>) -> Result<Self, ContentValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ContentValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ContentValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for DocumentTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DocumentTitle> for String {
    fn from(value: DocumentTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for DocumentTitle {
    type Error = ContentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated name of a gallery, unique within its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct GalleryName(String);

impl GalleryName {
    /// Validate and construct a [`GalleryName`].
    pub fn new(name: impl Into<String>) -> Result<Self, ContentValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ContentValidationError::EmptyGalleryName);
        }
        if name.chars().count() > GALLERY_NAME_MAX {
            return Err(ContentValidationError::GalleryNameTooLong {
                max: GALLERY_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for GalleryName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<GalleryName> for String {
    fn from(value: GalleryName) -> Self {
        value.0
    }
}

impl TryFrom<String> for GalleryName {
    type Error = ContentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A markdown document row: title plus immutable owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub title: DocumentTitle,
    pub owner_id: UserId,
}

/// One markdown-text unit belonging to a document.
///
/// `position` is the explicit ordering key; pages are returned sorted by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub content: String,
    pub document_id: DocumentId,
    pub position: i32,
}

/// A gallery row without its images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    pub id: GalleryId,
    pub name: GalleryName,
    pub document_id: DocumentId,
}

/// An uploaded image belonging to a gallery.
///
/// `filename` stores the public path (e.g. `/images/169...-photo.jpg`), so
/// clients can use it verbatim as an URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub filename: String,
    pub gallery_id: GalleryId,
}

/// A gallery with its ordered image path list, as returned over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledGallery {
    pub gallery: Gallery,
    /// Image paths in insertion order.
    pub image_paths: Vec<String>,
}

/// The transfer-ready aggregate for a document.
///
/// `pages` and `galleries` are always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    pub document: Document,
    pub pages: Vec<Page>,
    pub galleries: Vec<AssembledGallery>,
}

/// Create-or-update intent for a document, decided once at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentUpsert {
    Create {
        title: DocumentTitle,
        /// Seed one default page alongside the new document.
        with_default_page: bool,
    },
    Update {
        id: DocumentId,
        title: DocumentTitle,
    },
}

/// Create-or-update intent for a gallery, decided once at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryUpsert {
    Create {
        document_id: DocumentId,
        name: GalleryName,
    },
    Update {
        id: GalleryId,
        name: GalleryName,
    },
}

/// Default body for a freshly created page.
pub const DEFAULT_PAGE_CONTENT: &str = "# New Page";
