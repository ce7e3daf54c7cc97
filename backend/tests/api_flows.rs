//! End-to-end API flows over in-memory adapters.
//!
//! These tests drive the full HTTP surface the way a client would: register,
//! log in, then author documents, pages, galleries, and images with the
//! issued bearer token.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{test, web, App};
use serde_json::Value;

use sharkdown_backend::domain::ports::TokenService;
use sharkdown_backend::domain::{AccountService, ContentService};
use sharkdown_backend::inbound::http::documents::{
    delete_document, get_document, list_documents, upsert_document,
};
use sharkdown_backend::inbound::http::galleries::{delete_gallery, get_gallery, upsert_gallery};
use sharkdown_backend::inbound::http::images::{delete_image, upload_image};
use sharkdown_backend::inbound::http::pages::{
    create_page, delete_page, page_references, update_page,
};
use sharkdown_backend::inbound::http::users::{login, register};
use sharkdown_backend::inbound::http::HttpState;
use sharkdown_backend::test_support::{
    InMemoryContentRepository, InMemoryImageStore, InMemoryUserRepository, PlainTextHasher,
    UnsignedTokenService,
};
use sharkdown_backend::Trace;

const PASSWORD: &str = "hunter2-but-longer";

fn state() -> web::Data<HttpState> {
    let content_repo = Arc::new(InMemoryContentRepository::new());
    let users = Arc::new(InMemoryUserRepository::new(Arc::clone(&content_repo)));
    let tokens: Arc<dyn TokenService> = Arc::new(UnsignedTokenService);
    let accounts = AccountService::new(users, Arc::new(PlainTextHasher), Arc::clone(&tokens));
    let content = ContentService::new(content_repo, Arc::new(InMemoryImageStore::new()));
    web::Data::new(HttpState::new(accounts, content, tokens))
}

async fn app() -> impl Service<
    Request,
    Response = ServiceResponse<impl MessageBody<Error: std::fmt::Debug>>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(state())
            .wrap(Trace)
            .service(register)
            .service(login)
            .service(upsert_document)
            .service(delete_document)
            .service(list_documents)
            .service(get_document)
            .service(upsert_gallery)
            .service(delete_gallery)
            .service(get_gallery)
            .service(create_page)
            .service(update_page)
            .service(delete_page)
            .service(page_references)
            .service(upload_image)
            .service(delete_image),
    )
    .await
}

async fn sign_up<S, B>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let registered = test::TestRequest::post()
        .uri("/user/register")
        .set_json(serde_json::json!({
            "username": username,
            "unhashedPass": PASSWORD,
        }))
        .send_request(app)
        .await;
    assert_eq!(registered.status(), 201);

    let login_body: Value = test::call_and_read_body_json(
        app,
        test::TestRequest::post()
            .uri("/user/login")
            .set_json(serde_json::json!({
                "username": username,
                "unhashedPass": PASSWORD,
            }))
            .to_request(),
    )
    .await;
    login_body["token"].as_str().expect("token issued").to_owned()
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_web::test]
async fn registration_seeds_a_welcome_document() {
    let app = app().await;
    let token = sign_up(&app, "ada").await;

    let documents: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/documents/all")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;

    let listed = documents.as_array().expect("array of documents");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Your First Sharkdown Document");

    let id = listed[0]["id"].as_str().expect("document id");
    let document: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/document?id={id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;

    let pages = document["pages"].as_array().expect("pages");
    assert_eq!(pages.len(), 2);
    let galleries = document["galleries"].as_array().expect("galleries");
    assert_eq!(galleries.len(), 1);
    assert_eq!(galleries[0]["name"], "Dogs and Cats");
    assert_eq!(
        galleries[0]["imagePaths"]
            .as_array()
            .expect("image paths")
            .len(),
        5
    );

    // Page two of the welcome document embeds its gallery.
    let page_id = pages[1]["id"].as_str().expect("page id");
    let references: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/page/references?markdownPageId={page_id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    let references = references.as_array().expect("references");
    assert_eq!(references.len(), 1);
    assert_eq!(references[0]["name"], "Dogs and Cats");
    assert_eq!(references[0]["resolved"], true);
}

#[actix_web::test]
async fn authoring_flow_builds_a_document_with_galleries_and_pages() {
    let app = app().await;
    let token = sign_up(&app, "grace").await;

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/document")
            .insert_header(bearer(&token))
            .set_json(serde_json::json!({ "title": "Field Notes" }))
            .to_request(),
    )
    .await;
    let document_id = created["id"].as_str().expect("document id").to_owned();
    // New documents open with one default page.
    assert_eq!(created["pages"].as_array().expect("pages").len(), 1);

    let gallery: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/gallery")
            .insert_header(bearer(&token))
            .set_json(serde_json::json!({
                "name": "Sightings",
                "markdownDocumentId": document_id,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(gallery["name"], "Sightings");

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/page/create?markdownDocumentId={document_id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    let page_id = page["id"].as_str().expect("page id").to_owned();
    assert_eq!(page["position"], 1);

    let updated = test::TestRequest::post()
        .uri("/page/update")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "id": page_id,
            "content": "Seen today: gallery(Sightings) and gallery(Nowhere)",
        }))
        .send_request(&app)
        .await;
    assert_eq!(updated.status(), 200);

    let references: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/page/references?markdownPageId={page_id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    let references = references.as_array().expect("references");
    assert_eq!(references.len(), 2);
    assert_eq!(references[0]["name"], "Sightings");
    assert_eq!(references[0]["resolved"], true);
    assert_eq!(references[1]["name"], "Nowhere");
    assert_eq!(references[1]["resolved"], false);

    // Deleting the extra page hands back the reassembled document.
    let after_delete: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!(
                "/page/delete?markdownDocumentId={document_id}&markdownPageId={page_id}"
            ))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(after_delete["pages"].as_array().expect("pages").len(), 1);
}

#[actix_web::test]
async fn image_upload_round_trips_through_a_gallery() {
    let app = app().await;
    let token = sign_up(&app, "linus").await;

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/document")
            .insert_header(bearer(&token))
            .set_json(serde_json::json!({ "title": "Photo log" }))
            .to_request(),
    )
    .await;
    let document_id = created["id"].as_str().expect("document id").to_owned();

    let gallery: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/gallery")
            .insert_header(bearer(&token))
            .set_json(serde_json::json!({
                "name": "Snaps",
                "markdownDocumentId": document_id,
            }))
            .to_request(),
    )
    .await;
    let gallery_id = gallery["id"].as_str().expect("gallery id").to_owned();

    let boundary = "sharkdown-integration-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"galleryId\"\r\n\r\n\
         {gallery_id}\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"shark.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         not really a png\r\n\
         --{boundary}--\r\n"
    );
    let uploaded: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/upload")
            .insert_header(bearer(&token))
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(body)
            .to_request(),
    )
    .await;
    let filename = uploaded["filename"].as_str().expect("filename").to_owned();
    assert_eq!(
        uploaded["imagePath"],
        Value::String(format!("/images/{filename}"))
    );

    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/gallery?galleryId={gallery_id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(
        fetched["imagePaths"].as_array().expect("paths").len(),
        1,
        "uploaded image is listed in its gallery"
    );

    let deleted = test::TestRequest::post()
        .uri(&format!("/image/delete?filename={filename}"))
        .insert_header(bearer(&token))
        .send_request(&app)
        .await;
    assert_eq!(deleted.status(), 200);

    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/gallery?galleryId={gallery_id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert!(fetched["imagePaths"].as_array().expect("paths").is_empty());
}

#[actix_web::test]
async fn requests_without_a_token_get_a_traced_error_envelope() {
    let app = app().await;

    let response = test::TestRequest::get()
        .uri("/documents/all")
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);
    assert!(response.headers().contains_key("trace-id"));

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert!(body["traceId"].is_string());
}

#[actix_web::test]
async fn documents_are_invisible_across_accounts() {
    let app = app().await;
    let author = sign_up(&app, "author").await;
    let other = sign_up(&app, "other").await;

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/document")
            .insert_header(bearer(&author))
            .set_json(serde_json::json!({ "title": "Private" }))
            .to_request(),
    )
    .await;
    let document_id = created["id"].as_str().expect("document id");

    let response = test::TestRequest::get()
        .uri(&format!("/document?id={document_id}"))
        .insert_header(bearer(&other))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 403);

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/documents/all")
            .insert_header(bearer(&other))
            .to_request(),
    )
    .await;
    let titles: Vec<&str> = listed
        .as_array()
        .expect("array of documents")
        .iter()
        .filter_map(|doc| doc["title"].as_str())
        .collect();
    assert!(!titles.contains(&"Private"));
}
