//! [`ContentService`] behaviour over the in-memory adapters.

use std::sync::Arc;

use rstest::rstest;

use crate::domain::content::{
    DocumentTitle, DocumentUpsert, GalleryName, GalleryUpsert, DEFAULT_PAGE_CONTENT,
};
use crate::domain::content_service::ContentService;
use crate::domain::error::ErrorCode;
use crate::domain::references::ReferenceTarget;
use crate::domain::user::UserId;
use crate::domain::welcome::WelcomeSeed;
use crate::test_support::{InMemoryContentRepository, InMemoryImageStore};

struct Harness {
    service: ContentService,
    repo: Arc<InMemoryContentRepository>,
    store: Arc<InMemoryImageStore>,
    owner: UserId,
    stranger: UserId,
}

fn harness() -> Harness {
    let repo = Arc::new(InMemoryContentRepository::new());
    let store = Arc::new(InMemoryImageStore::new());
    Harness {
        service: ContentService::new(repo.clone(), store.clone()),
        repo,
        store,
        owner: UserId::random(),
        stranger: UserId::random(),
    }
}

fn title(raw: &str) -> DocumentTitle {
    DocumentTitle::new(raw).expect("valid title")
}

fn gallery_name(raw: &str) -> GalleryName {
    GalleryName::new(raw).expect("valid gallery name")
}

#[rstest]
#[case(true, 1)]
#[case(false, 0)]
#[tokio::test]
async fn create_document_honours_default_page_flag(
    #[case] with_default_page: bool,
    #[case] expected_pages: usize,
) {
    let h = harness();
    let outcome = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Notes"),
                with_default_page,
            },
        )
        .await
        .expect("create succeeds");

    assert!(outcome.created);
    assert_eq!(outcome.document.pages.len(), expected_pages);
    if let Some(page) = outcome.document.pages.first() {
        assert_eq!(page.content, DEFAULT_PAGE_CONTENT);
        assert_eq!(page.position, 0);
    }
}

#[tokio::test]
async fn update_document_retitles_and_preserves_children() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Draft"),
                with_default_page: true,
            },
        )
        .await
        .expect("create succeeds");
    let id = created.document.document.id;

    let updated = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Update {
                id,
                title: title("Final"),
            },
        )
        .await
        .expect("update succeeds");

    assert!(!updated.created);
    assert_eq!(updated.document.document.id, id);
    assert_eq!(updated.document.document.title, title("Final"));
    assert_eq!(updated.document.pages.len(), 1);
}

#[tokio::test]
async fn update_of_unowned_document_is_forbidden() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Private"),
                with_default_page: false,
            },
        )
        .await
        .expect("create succeeds");

    let err = h
        .service
        .upsert_document(
            &h.stranger,
            DocumentUpsert::Update {
                id: created.document.document.id,
                title: title("Hijacked"),
            },
        )
        .await
        .expect_err("stranger must not retitle");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn delete_document_cascades_and_is_idempotent() {
    let h = harness();
    h.repo.seed_welcome(&h.owner, &WelcomeSeed::standard());
    let documents = h.service.list_documents(&h.owner).await.expect("list");
    let id = documents[0].id;
    let assembled = h
        .service
        .get_document(&h.owner, &id)
        .await
        .expect("seeded document assembles");
    let page_id = assembled.pages[0].id;
    let gallery_id = assembled.galleries[0].gallery.id;

    h.service
        .delete_document(&h.owner, &id)
        .await
        .expect("delete succeeds");

    let err = h
        .service
        .get_document(&h.owner, &id)
        .await
        .expect_err("document gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let err = h
        .service
        .update_page(&h.owner, &page_id, "orphan")
        .await
        .expect_err("pages cascaded away");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let err = h
        .service
        .get_gallery(&h.owner, &gallery_id)
        .await
        .expect_err("galleries cascaded away");
    assert_eq!(err.code(), ErrorCode::NotFound);

    // A second delete of the same id still succeeds.
    h.service
        .delete_document(&h.owner, &id)
        .await
        .expect("repeat delete is a no-op");
}

#[tokio::test]
async fn list_documents_is_scoped_to_caller() {
    let h = harness();
    h.repo.seed_welcome(&h.owner, &WelcomeSeed::standard());
    h.repo.seed_welcome(&h.stranger, &WelcomeSeed::standard());

    let owned = h.service.list_documents(&h.owner).await.expect("list");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].owner_id, h.owner);
}

#[tokio::test]
async fn pages_append_in_position_order() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Chapters"),
                with_default_page: true,
            },
        )
        .await
        .expect("create succeeds");
    let document_id = created.document.document.id;

    let second = h
        .service
        .create_page(&h.owner, &document_id)
        .await
        .expect("second page");
    let third = h
        .service
        .create_page(&h.owner, &document_id)
        .await
        .expect("third page");
    assert_eq!(second.position, 1);
    assert_eq!(third.position, 2);

    let assembled = h
        .service
        .get_document(&h.owner, &document_id)
        .await
        .expect("assemble");
    let positions: Vec<i32> = assembled.pages.iter().map(|page| page.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[tokio::test]
async fn update_page_leaves_siblings_untouched() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Chapters"),
                with_default_page: true,
            },
        )
        .await
        .expect("create succeeds");
    let document_id = created.document.document.id;
    let sibling = created.document.pages[0].id;
    let target = h
        .service
        .create_page(&h.owner, &document_id)
        .await
        .expect("second page");

    let updated = h
        .service
        .update_page(&h.owner, &target.id, "# Revised")
        .await
        .expect("update succeeds");
    assert_eq!(updated.content, "# Revised");

    let assembled = h
        .service
        .get_document(&h.owner, &document_id)
        .await
        .expect("assemble");
    let untouched = assembled
        .pages
        .iter()
        .find(|page| page.id == sibling)
        .expect("sibling survives");
    assert_eq!(untouched.content, DEFAULT_PAGE_CONTENT);
}

#[tokio::test]
async fn delete_page_rejects_page_from_another_document() {
    let h = harness();
    let first = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("First"),
                with_default_page: true,
            },
        )
        .await
        .expect("first document");
    let second = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Second"),
                with_default_page: true,
            },
        )
        .await
        .expect("second document");

    let err = h
        .service
        .delete_page(
            &h.owner,
            &first.document.document.id,
            &second.document.pages[0].id,
        )
        .await
        .expect_err("cross-document delete rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    // The mismatched page is untouched.
    let assembled = h
        .service
        .get_document(&h.owner, &second.document.document.id)
        .await
        .expect("assemble");
    assert_eq!(assembled.pages.len(), 1);
}

#[tokio::test]
async fn delete_absent_page_returns_document_unchanged() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Notes"),
                with_default_page: true,
            },
        )
        .await
        .expect("create succeeds");
    let document_id = created.document.document.id;
    let page_id = created.document.pages[0].id;

    let after_first = h
        .service
        .delete_page(&h.owner, &document_id, &page_id)
        .await
        .expect("delete succeeds");
    assert!(after_first.pages.is_empty());

    let after_second = h
        .service
        .delete_page(&h.owner, &document_id, &page_id)
        .await
        .expect("repeat delete is a no-op");
    assert!(after_second.pages.is_empty());
}

#[tokio::test]
async fn gallery_names_are_unique_per_document() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Albums"),
                with_default_page: false,
            },
        )
        .await
        .expect("create succeeds");
    let document_id = created.document.document.id;

    h.service
        .upsert_gallery(
            &h.owner,
            GalleryUpsert::Create {
                document_id,
                name: gallery_name("Holiday"),
            },
        )
        .await
        .expect("first gallery");
    let err = h
        .service
        .upsert_gallery(
            &h.owner,
            GalleryUpsert::Create {
                document_id,
                name: gallery_name("Holiday"),
            },
        )
        .await
        .expect_err("duplicate name conflicts");
    assert_eq!(err.code(), ErrorCode::Conflict);

    // The same name in another document is fine.
    let other = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Other"),
                with_default_page: false,
            },
        )
        .await
        .expect("second document");
    h.service
        .upsert_gallery(
            &h.owner,
            GalleryUpsert::Create {
                document_id: other.document.document.id,
                name: gallery_name("Holiday"),
            },
        )
        .await
        .expect("same name elsewhere");
}

#[tokio::test]
async fn rename_gallery_keeps_images() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Albums"),
                with_default_page: false,
            },
        )
        .await
        .expect("create succeeds");
    let gallery = h
        .service
        .upsert_gallery(
            &h.owner,
            GalleryUpsert::Create {
                document_id: created.document.document.id,
                name: gallery_name("Before"),
            },
        )
        .await
        .expect("gallery created");
    h.service
        .upload_image(&h.owner, &gallery.gallery.id, "cat.jpg", vec![1, 2, 3])
        .await
        .expect("upload succeeds");

    let renamed = h
        .service
        .upsert_gallery(
            &h.owner,
            GalleryUpsert::Update {
                id: gallery.gallery.id,
                name: gallery_name("After"),
            },
        )
        .await
        .expect("rename succeeds");
    assert_eq!(renamed.gallery.name, gallery_name("After"));
    assert_eq!(renamed.image_paths.len(), 1);
}

#[tokio::test]
async fn delete_gallery_returns_reassembled_document() {
    let h = harness();
    h.repo.seed_welcome(&h.owner, &WelcomeSeed::standard());
    let documents = h.service.list_documents(&h.owner).await.expect("list");
    let assembled = h
        .service
        .get_document(&h.owner, &documents[0].id)
        .await
        .expect("assemble");
    let gallery_id = assembled.galleries[0].gallery.id;

    let after = h
        .service
        .delete_gallery(&h.owner, &gallery_id)
        .await
        .expect("delete succeeds");
    assert!(after.galleries.is_empty());
    assert_eq!(after.pages.len(), assembled.pages.len());
}

#[tokio::test]
async fn stranger_cannot_reach_child_rows_by_id() {
    let h = harness();
    h.repo.seed_welcome(&h.owner, &WelcomeSeed::standard());
    let documents = h.service.list_documents(&h.owner).await.expect("list");
    let assembled = h
        .service
        .get_document(&h.owner, &documents[0].id)
        .await
        .expect("assemble");
    let page_id = assembled.pages[0].id;
    let gallery_id = assembled.galleries[0].gallery.id;

    let err = h
        .service
        .update_page(&h.stranger, &page_id, "defaced")
        .await
        .expect_err("page edit forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let err = h
        .service
        .get_gallery(&h.stranger, &gallery_id)
        .await
        .expect_err("gallery read forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let err = h
        .service
        .upload_image(&h.stranger, &gallery_id, "x.png", vec![0])
        .await
        .expect_err("upload forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn seeded_welcome_page_resolves_its_gallery_reference() {
    let h = harness();
    h.repo.seed_welcome(&h.owner, &WelcomeSeed::standard());
    let documents = h.service.list_documents(&h.owner).await.expect("list");
    let assembled = h
        .service
        .get_document(&h.owner, &documents[0].id)
        .await
        .expect("assemble");
    let gallery_page = assembled
        .pages
        .iter()
        .find(|page| page.content.contains("gallery("))
        .expect("welcome seed embeds a gallery reference");

    let references = h
        .service
        .page_references(&h.owner, &gallery_page.id)
        .await
        .expect("references resolve");
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].name, "Dogs and Cats");
    assert!(matches!(
        references[0].target,
        ReferenceTarget::Resolved { gallery_id } if gallery_id == assembled.galleries[0].gallery.id
    ));
}

#[tokio::test]
async fn upload_stores_blob_and_row_together() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Albums"),
                with_default_page: false,
            },
        )
        .await
        .expect("create succeeds");
    let gallery = h
        .service
        .upsert_gallery(
            &h.owner,
            GalleryUpsert::Create {
                document_id: created.document.document.id,
                name: gallery_name("Pets"),
            },
        )
        .await
        .expect("gallery created");

    let stored = h
        .service
        .upload_image(&h.owner, &gallery.gallery.id, "dog.jpg", vec![9, 9])
        .await
        .expect("upload succeeds");
    assert!(stored.public_path.starts_with("/images/"));
    assert!(stored.public_path.ends_with(&stored.filename));
    assert!(h.store.contains(&stored.filename));

    let fetched = h
        .service
        .get_gallery(&h.owner, &gallery.gallery.id)
        .await
        .expect("gallery assembles");
    assert_eq!(fetched.image_paths, vec![stored.public_path.clone()]);
}

#[tokio::test]
async fn delete_image_removes_row_and_blob() {
    let h = harness();
    let created = h
        .service
        .upsert_document(
            &h.owner,
            DocumentUpsert::Create {
                title: title("Albums"),
                with_default_page: false,
            },
        )
        .await
        .expect("create succeeds");
    let gallery = h
        .service
        .upsert_gallery(
            &h.owner,
            GalleryUpsert::Create {
                document_id: created.document.document.id,
                name: gallery_name("Pets"),
            },
        )
        .await
        .expect("gallery created");
    let stored = h
        .service
        .upload_image(&h.owner, &gallery.gallery.id, "dog.jpg", vec![9])
        .await
        .expect("upload succeeds");

    h.service
        .delete_image(&h.owner, &stored.filename)
        .await
        .expect("delete succeeds");
    assert!(!h.store.contains(&stored.filename));
    let fetched = h
        .service
        .get_gallery(&h.owner, &gallery.gallery.id)
        .await
        .expect("gallery assembles");
    assert!(fetched.image_paths.is_empty());

    // Deleting the same filename again is a no-op.
    h.service
        .delete_image(&h.owner, &stored.filename)
        .await
        .expect("repeat delete is a no-op");
}
