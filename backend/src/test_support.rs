//! In-memory port implementations for tests.
//!
//! These adapters back the same ports the Diesel and filesystem adapters
//! implement, so handler and service tests exercise real wiring without a
//! database or disk. Available to integration tests via the
//! `test-support` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::content::{
    Document, DocumentId, DocumentTitle, Gallery, GalleryId, GalleryName, Image, ImageId, Page,
    PageId, DEFAULT_PAGE_CONTENT,
};
use crate::domain::ports::{
    ContentPersistenceError, ContentRepository, ImageStore, ImageStoreError, NewAccount,
    PasswordHashError, PasswordHasher, StoredImage, TokenClaims, TokenError, TokenService,
    UserPersistenceError, UserRepository,
};
use crate::domain::user::{PasswordHash, User, UserId, Username};
use crate::domain::welcome::WelcomeSeed;

#[derive(Default)]
struct ContentState {
    documents: HashMap<DocumentId, Document>,
    pages: HashMap<PageId, Page>,
    galleries: HashMap<GalleryId, Gallery>,
    images: Vec<Image>,
}

impl ContentState {
    fn next_position(&self, document: &DocumentId) -> i32 {
        self.pages
            .values()
            .filter(|page| page.document_id == *document)
            .map(|page| page.position)
            .max()
            .map_or(0, |max| max + 1)
    }

    fn insert_page(&mut self, document: DocumentId, content: &str) -> Page {
        let page = Page {
            id: PageId::random(),
            content: content.to_owned(),
            document_id: document,
            position: self.next_position(&document),
        };
        self.pages.insert(page.id, page.clone());
        page
    }

    fn insert_gallery(
        &mut self,
        document: DocumentId,
        name: &GalleryName,
    ) -> Result<Gallery, ContentPersistenceError> {
        let duplicate = self
            .galleries
            .values()
            .any(|gallery| gallery.document_id == document && gallery.name == *name);
        if duplicate {
            return Err(ContentPersistenceError::duplicate_name(name.as_ref()));
        }
        let gallery = Gallery {
            id: GalleryId::random(),
            name: name.clone(),
            document_id: document,
        };
        self.galleries.insert(gallery.id, gallery.clone());
        Ok(gallery)
    }

    fn insert_image(&mut self, gallery: GalleryId, filename: &str) -> Image {
        let image = Image {
            id: ImageId::random(),
            filename: filename.to_owned(),
            gallery_id: gallery,
        };
        self.images.push(image.clone());
        image
    }

    fn cascade_delete_gallery(&mut self, id: &GalleryId) {
        self.images.retain(|image| image.gallery_id != *id);
        self.galleries.remove(id);
    }

    fn cascade_delete_document(&mut self, id: &DocumentId) {
        self.pages.retain(|_, page| page.document_id != *id);
        let gallery_ids: Vec<GalleryId> = self
            .galleries
            .values()
            .filter(|gallery| gallery.document_id == *id)
            .map(|gallery| gallery.id)
            .collect();
        for gallery_id in gallery_ids {
            self.cascade_delete_gallery(&gallery_id);
        }
        self.documents.remove(id);
    }
}

/// In-memory [`ContentRepository`] with cascade-delete semantics.
#[derive(Default)]
pub struct InMemoryContentRepository {
    state: Mutex<ContentState>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ContentState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Seed welcome content for an owner, mirroring what the Diesel adapter
    /// does inside the registration transaction.
    pub fn seed_welcome(&self, owner: &UserId, welcome: &WelcomeSeed) {
        self.with_state(|state| {
            let document = Document {
                id: DocumentId::random(),
                title: welcome.document_title.clone(),
                owner_id: *owner,
            };
            let document_id = document.id;
            state.documents.insert(document_id, document);
            for content in &welcome.page_contents {
                state.insert_page(document_id, content);
            }
            if let Ok(gallery) = state.insert_gallery(document_id, &welcome.gallery_name) {
                for path in &welcome.image_paths {
                    state.insert_image(gallery.id, path);
                }
            }
        });
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn insert_document(
        &self,
        owner: &UserId,
        title: &DocumentTitle,
        with_default_page: bool,
    ) -> Result<Document, ContentPersistenceError> {
        Ok(self.with_state(|state| {
            let document = Document {
                id: DocumentId::random(),
                title: title.clone(),
                owner_id: *owner,
            };
            state.documents.insert(document.id, document.clone());
            if with_default_page {
                state.insert_page(document.id, DEFAULT_PAGE_CONTENT);
            }
            document
        }))
    }

    async fn update_document_title(
        &self,
        id: &DocumentId,
        title: &DocumentTitle,
    ) -> Result<bool, ContentPersistenceError> {
        Ok(self.with_state(|state| match state.documents.get_mut(id) {
            Some(document) => {
                document.title = title.clone();
                true
            }
            None => false,
        }))
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), ContentPersistenceError> {
        self.with_state(|state| state.cascade_delete_document(id));
        Ok(())
    }

    async fn find_document(
        &self,
        id: &DocumentId,
    ) -> Result<Option<Document>, ContentPersistenceError> {
        Ok(self.with_state(|state| state.documents.get(id).cloned()))
    }

    async fn documents_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Document>, ContentPersistenceError> {
        Ok(self.with_state(|state| {
            let mut documents: Vec<Document> = state
                .documents
                .values()
                .filter(|document| document.owner_id == *owner)
                .cloned()
                .collect();
            documents.sort_by_key(|document| *document.id.as_uuid());
            documents
        }))
    }

    async fn insert_page(
        &self,
        document: &DocumentId,
        content: &str,
    ) -> Result<Page, ContentPersistenceError> {
        self.with_state(|state| {
            if !state.documents.contains_key(document) {
                return Err(ContentPersistenceError::missing_parent("document not found"));
            }
            Ok(state.insert_page(*document, content))
        })
    }

    async fn update_page_content(
        &self,
        page: &PageId,
        content: &str,
    ) -> Result<Option<Page>, ContentPersistenceError> {
        Ok(self.with_state(|state| {
            state.pages.get_mut(page).map(|existing| {
                existing.content = content.to_owned();
                existing.clone()
            })
        }))
    }

    async fn delete_page(&self, page: &PageId) -> Result<(), ContentPersistenceError> {
        self.with_state(|state| {
            state.pages.remove(page);
        });
        Ok(())
    }

    async fn find_page(&self, page: &PageId) -> Result<Option<Page>, ContentPersistenceError> {
        Ok(self.with_state(|state| state.pages.get(page).cloned()))
    }

    async fn pages_for_document(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<Page>, ContentPersistenceError> {
        Ok(self.with_state(|state| {
            let mut pages: Vec<Page> = state
                .pages
                .values()
                .filter(|page| page.document_id == *document)
                .cloned()
                .collect();
            pages.sort_by_key(|page| page.position);
            pages
        }))
    }

    async fn insert_gallery(
        &self,
        document: &DocumentId,
        name: &GalleryName,
    ) -> Result<Gallery, ContentPersistenceError> {
        self.with_state(|state| {
            if !state.documents.contains_key(document) {
                return Err(ContentPersistenceError::missing_parent("document not found"));
            }
            state.insert_gallery(*document, name)
        })
    }

    async fn rename_gallery(
        &self,
        id: &GalleryId,
        name: &GalleryName,
    ) -> Result<bool, ContentPersistenceError> {
        self.with_state(|state| {
            let Some(current) = state.galleries.get(id).cloned() else {
                return Ok(false);
            };
            let duplicate = state.galleries.values().any(|gallery| {
                gallery.id != *id
                    && gallery.document_id == current.document_id
                    && gallery.name == *name
            });
            if duplicate {
                return Err(ContentPersistenceError::duplicate_name(name.as_ref()));
            }
            if let Some(gallery) = state.galleries.get_mut(id) {
                gallery.name = name.clone();
            }
            Ok(true)
        })
    }

    async fn delete_gallery(&self, id: &GalleryId) -> Result<(), ContentPersistenceError> {
        self.with_state(|state| state.cascade_delete_gallery(id));
        Ok(())
    }

    async fn find_gallery(
        &self,
        id: &GalleryId,
    ) -> Result<Option<Gallery>, ContentPersistenceError> {
        Ok(self.with_state(|state| state.galleries.get(id).cloned()))
    }

    async fn galleries_for_document(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<Gallery>, ContentPersistenceError> {
        Ok(self.with_state(|state| {
            let mut galleries: Vec<Gallery> = state
                .galleries
                .values()
                .filter(|gallery| gallery.document_id == *document)
                .cloned()
                .collect();
            galleries.sort_by_key(|gallery| *gallery.id.as_uuid());
            galleries
        }))
    }

    async fn insert_image(
        &self,
        gallery: &GalleryId,
        filename: &str,
    ) -> Result<Image, ContentPersistenceError> {
        self.with_state(|state| {
            if !state.galleries.contains_key(gallery) {
                return Err(ContentPersistenceError::missing_parent("gallery not found"));
            }
            Ok(state.insert_image(*gallery, filename))
        })
    }

    async fn delete_image_by_filename(
        &self,
        filename: &str,
    ) -> Result<(), ContentPersistenceError> {
        self.with_state(|state| {
            state.images.retain(|image| image.filename != filename);
        });
        Ok(())
    }

    async fn find_image_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<Image>, ContentPersistenceError> {
        Ok(self.with_state(|state| {
            state
                .images
                .iter()
                .find(|image| image.filename == filename)
                .cloned()
        }))
    }

    async fn images_for_gallery(
        &self,
        gallery: &GalleryId,
    ) -> Result<Vec<Image>, ContentPersistenceError> {
        Ok(self.with_state(|state| {
            state
                .images
                .iter()
                .filter(|image| image.gallery_id == *gallery)
                .cloned()
                .collect()
        }))
    }
}

/// In-memory [`UserRepository`] that seeds welcome content into a shared
/// [`InMemoryContentRepository`], mirroring the transactional production
/// path.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    content: std::sync::Arc<InMemoryContentRepository>,
}

impl InMemoryUserRepository {
    pub fn new(content: std::sync::Arc<InMemoryContentRepository>) -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            content,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_account(
        &self,
        account: NewAccount,
        welcome: &WelcomeSeed,
    ) -> Result<User, UserPersistenceError> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        if users.iter().any(|user| user.username == account.username) {
            return Err(UserPersistenceError::duplicate_username(
                account.username.as_ref(),
            ));
        }
        let user = User {
            id: UserId::random(),
            username: account.username,
            password_hash: account.password_hash,
        };
        users.push(user.clone());
        self.content.seed_welcome(&user.id, welcome);
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|user| user.username == *username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|user| user.id == *id)
            .cloned())
    }
}

/// Reversible stand-in hasher so tests skip real key derivation.
pub struct PlainTextHasher;

#[async_trait]
impl PasswordHasher for PlainTextHasher {
    async fn hash(&self, cleartext: &str) -> Result<PasswordHash, PasswordHashError> {
        PasswordHash::new(format!("plain:{cleartext}"))
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    async fn verify(
        &self,
        cleartext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str() == format!("plain:{cleartext}"))
    }
}

/// Token service whose tokens are the bare user id, no signing.
pub struct UnsignedTokenService;

#[async_trait]
impl TokenService for UnsignedTokenService {
    async fn issue(&self, user_id: &UserId) -> Result<String, TokenError> {
        Ok(user_id.to_string())
    }

    async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        token
            .parse()
            .map(|user_id| TokenClaims { user_id })
            .map_err(|_| TokenError::Invalid)
    }
}

/// Image store that keeps bytes in memory and namespaces filenames with a
/// counter instead of a timestamp.
#[derive(Default)]
pub struct InMemoryImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
    counter: std::sync::atomic::AtomicU64,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stored file with this name still exists.
    pub fn contains(&self, filename: &str) -> bool {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(filename)
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save(
        &self,
        original_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredImage, ImageStoreError> {
        if original_filename.trim().is_empty() {
            return Err(ImageStoreError::invalid_filename(
                "original filename must not be empty",
            ));
        }
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let filename = format!("{n}-{original_filename}");
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(filename.clone(), bytes);
        Ok(StoredImage {
            public_path: format!("/images/{filename}"),
            filename,
        })
    }

    async fn remove(&self, filename: &str) -> Result<(), ImageStoreError> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(filename);
        Ok(())
    }
}
