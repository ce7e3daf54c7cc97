//! Test helpers for inbound HTTP components.
//!
//! Builds an app over the in-memory adapters with every content route
//! registered, plus request helpers for the register/login/create flows the
//! endpoint tests keep repeating.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{test as actix_test, web, App};
use serde_json::{json, Value};

use crate::domain::ports::TokenService;
use crate::domain::{AccountService, ContentService, DocumentId, GalleryId};
use crate::test_support::{
    InMemoryContentRepository, InMemoryImageStore, InMemoryUserRepository, PlainTextHasher,
    UnsignedTokenService,
};

use super::state::HttpState;

/// HTTP state backed entirely by in-memory adapters.
pub fn test_state() -> web::Data<HttpState> {
    let content_repo = Arc::new(InMemoryContentRepository::new());
    let tokens: Arc<dyn TokenService> = Arc::new(UnsignedTokenService);
    web::Data::new(HttpState::new(
        AccountService::new(
            Arc::new(InMemoryUserRepository::new(content_repo.clone())),
            Arc::new(PlainTextHasher),
            tokens.clone(),
        ),
        ContentService::new(content_repo, Arc::new(InMemoryImageStore::new())),
        tokens,
    ))
}

/// An app with every account and content route mounted at the root.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .service(super::users::register)
        .service(super::users::login)
        .service(super::documents::upsert_document)
        .service(super::documents::delete_document)
        .service(super::documents::list_documents)
        .service(super::documents::get_document)
        .service(super::galleries::upsert_gallery)
        .service(super::galleries::delete_gallery)
        .service(super::galleries::get_gallery)
        .service(super::pages::create_page)
        .service(super::pages::update_page)
        .service(super::pages::delete_page)
        .service(super::pages::page_references)
        .service(super::images::upload_image)
        .service(super::images::delete_image)
}

/// Authorization header pair for a bearer token.
pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Register `username` and return a login token.
pub async fn register_user<S, B>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let register_req = actix_test::TestRequest::post()
        .uri("/user/register")
        .set_json(&json!({ "username": username, "unhashedPass": "secret" }))
        .to_request();
    let register_res = actix_test::call_service(app, register_req).await;
    assert!(
        register_res.status().is_success(),
        "registration failed: {}",
        register_res.status()
    );

    let login_req = actix_test::TestRequest::post()
        .uri("/user/login")
        .set_json(&json!({ "username": username, "unhashedPass": "secret" }))
        .to_request();
    let body: Value = actix_test::read_body_json(actix_test::call_service(app, login_req).await).await;
    body["token"].as_str().expect("login token").to_owned()
}

/// Create a document (with its default page) and return its id.
pub async fn create_document<S, B>(app: &S, token: &str, title: &str) -> DocumentId
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let req = actix_test::TestRequest::post()
        .uri("/document")
        .insert_header(bearer(token))
        .set_json(&json!({ "title": title }))
        .to_request();
    let body: Value = actix_test::read_body_json(actix_test::call_service(app, req).await).await;
    body["id"]
        .as_str()
        .expect("document id")
        .parse()
        .expect("valid document id")
}

/// Create a gallery in `document_id` and return its id.
pub async fn create_gallery<S, B>(
    app: &S,
    token: &str,
    document_id: DocumentId,
    name: &str,
) -> GalleryId
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let req = actix_test::TestRequest::post()
        .uri("/gallery")
        .insert_header(bearer(token))
        .set_json(&json!({ "name": name, "markdownDocumentId": document_id }))
        .to_request();
    let body: Value = actix_test::read_body_json(actix_test::call_service(app, req).await).await;
    body["id"]
        .as_str()
        .expect("gallery id")
        .parse()
        .expect("valid gallery id")
}
