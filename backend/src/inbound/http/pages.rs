//! Page endpoints.
//!
//! ```text
//! POST /page/create      ?markdownDocumentId=<uuid>
//! POST /page/update      {"id":"<uuid>","content":"# Edited"}
//! POST /page/delete      ?markdownDocumentId=<uuid>&markdownPageId=<uuid>
//! GET  /page/references  ?markdownPageId=<uuid>
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{DocumentId, Error, PageId};

use super::auth::AuthenticatedUser;
use super::schemas::{DocumentDto, GalleryReferenceDto, PageDto, SuccessResponse};
use super::state::HttpState;
use super::ApiResult;

/// Query of `POST /page/create`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageCreateQuery {
    pub markdown_document_id: DocumentId,
}

/// Body of `POST /page/update`; replaces the content wholesale.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdateRequest {
    pub id: PageId,
    pub content: String,
}

/// Query of `POST /page/delete`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageDeleteQuery {
    pub markdown_document_id: DocumentId,
    pub markdown_page_id: PageId,
}

/// Query of `GET /page/references`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageReferencesQuery {
    pub markdown_page_id: PageId,
}

/// Append a page with the default placeholder content to an owned document.
#[utoipa::path(
    post,
    path = "/page/create",
    params(PageCreateQuery),
    responses(
        (status = 200, description = "The new page", body = PageDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown document id", body = Error)
    ),
    tags = ["pages"],
    operation_id = "createPage"
)]
#[post("/page/create")]
pub async fn create_page(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<PageCreateQuery>,
) -> ApiResult<web::Json<PageDto>> {
    let page = state
        .content
        .create_page(&user.id(), &query.markdown_document_id)
        .await?;
    Ok(web::Json(PageDto::from(page)))
}

/// Replace an owned page's content.
#[utoipa::path(
    post,
    path = "/page/update",
    request_body = PageUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = SuccessResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown page id", body = Error)
    ),
    tags = ["pages"],
    operation_id = "updatePage"
)]
#[post("/page/update")]
pub async fn update_page(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<PageUpdateRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let payload = payload.into_inner();
    state
        .content
        .update_page(&user.id(), &payload.id, &payload.content)
        .await?;
    Ok(web::Json(SuccessResponse::new()))
}

/// Delete a page from an owned document; returns the document reassembled.
#[utoipa::path(
    post,
    path = "/page/delete",
    params(PageDeleteQuery),
    responses(
        (status = 200, description = "Owning document after deletion", body = DocumentDto),
        (status = 400, description = "Page belongs to a different document", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown document id", body = Error)
    ),
    tags = ["pages"],
    operation_id = "deletePage"
)]
#[post("/page/delete")]
pub async fn delete_page(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<PageDeleteQuery>,
) -> ApiResult<web::Json<DocumentDto>> {
    let document = state
        .content
        .delete_page(&user.id(), &query.markdown_document_id, &query.markdown_page_id)
        .await?;
    Ok(web::Json(DocumentDto::from(document)))
}

/// Resolve the page's `gallery(Name)` tokens against the owning document's
/// galleries, in order of appearance.
#[utoipa::path(
    get,
    path = "/page/references",
    params(PageReferencesQuery),
    responses(
        (status = 200, description = "Ordered resolution results", body = [GalleryReferenceDto]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown page id", body = Error)
    ),
    tags = ["pages"],
    operation_id = "pageReferences"
)]
#[get("/page/references")]
pub async fn page_references(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<PageReferencesQuery>,
) -> ApiResult<web::Json<Vec<GalleryReferenceDto>>> {
    let references = state
        .content
        .page_references(&user.id(), &query.markdown_page_id)
        .await?;
    Ok(web::Json(
        references.into_iter().map(GalleryReferenceDto::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use actix_web::test as actix_test;
    use serde_json::Value;

    use super::*;
    use crate::domain::content::DEFAULT_PAGE_CONTENT;
    use crate::inbound::http::test_fixtures::{
        bearer, create_document, register_user, test_app, test_state,
    };

    #[actix_web::test]
    async fn create_update_delete_page_flow() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let token = register_user(&app, "ada").await;
        let document_id = create_document(&app, &token, "Chapters").await;

        let create_req = actix_test::TestRequest::post()
            .uri(&format!("/page/create?markdownDocumentId={document_id}"))
            .insert_header(bearer(&token))
            .to_request();
        let page: Value =
            actix_test::read_body_json(actix_test::call_service(&app, create_req).await).await;
        assert_eq!(page["content"], DEFAULT_PAGE_CONTENT);
        let page_id = page["id"].as_str().expect("id").to_owned();

        let update_req = actix_test::TestRequest::post()
            .uri("/page/update")
            .insert_header(bearer(&token))
            .set_json(&serde_json::json!({ "id": page_id, "content": "# Edited" }))
            .to_request();
        let update_res = actix_test::call_service(&app, update_req).await;
        assert!(update_res.status().is_success());

        let delete_req = actix_test::TestRequest::post()
            .uri(&format!(
                "/page/delete?markdownDocumentId={document_id}&markdownPageId={page_id}"
            ))
            .insert_header(bearer(&token))
            .to_request();
        let document: Value =
            actix_test::read_body_json(actix_test::call_service(&app, delete_req).await).await;
        let remaining: Vec<&str> = document["pages"]
            .as_array()
            .expect("pages")
            .iter()
            .filter_map(|p| p["id"].as_str())
            .collect();
        assert!(!remaining.contains(&page_id.as_str()));
    }

    #[actix_web::test]
    async fn update_of_unknown_page_is_not_found() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let token = register_user(&app, "ada").await;

        let req = actix_test::TestRequest::post()
            .uri("/page/update")
            .insert_header(bearer(&token))
            .set_json(&PageUpdateRequest {
                id: PageId::random(),
                content: "# Ghost".into(),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn references_resolve_against_document_galleries() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let token = register_user(&app, "ada").await;
        let document_id = create_document(&app, &token, "Notes").await;

        let gallery_req = actix_test::TestRequest::post()
            .uri("/gallery")
            .insert_header(bearer(&token))
            .set_json(&serde_json::json!({
                "name": "Pets",
                "markdownDocumentId": document_id,
            }))
            .to_request();
        let gallery: Value =
            actix_test::read_body_json(actix_test::call_service(&app, gallery_req).await).await;

        let page_req = actix_test::TestRequest::post()
            .uri(&format!("/page/create?markdownDocumentId={document_id}"))
            .insert_header(bearer(&token))
            .to_request();
        let page: Value =
            actix_test::read_body_json(actix_test::call_service(&app, page_req).await).await;
        let page_id = page["id"].as_str().expect("id").to_owned();

        let update_req = actix_test::TestRequest::post()
            .uri("/page/update")
            .insert_header(bearer(&token))
            .set_json(&serde_json::json!({
                "id": page_id,
                "content": "intro gallery(Pets) middle gallery(Missing) end",
            }))
            .to_request();
        actix_test::call_service(&app, update_req).await;

        let refs_req = actix_test::TestRequest::get()
            .uri(&format!("/page/references?markdownPageId={page_id}"))
            .insert_header(bearer(&token))
            .to_request();
        let refs: Value =
            actix_test::read_body_json(actix_test::call_service(&app, refs_req).await).await;
        let refs = refs.as_array().expect("array");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0]["name"], "Pets");
        assert_eq!(refs[0]["resolved"], true);
        assert_eq!(refs[0]["galleryId"], gallery["id"]);
        assert_eq!(refs[1]["name"], "Missing");
        assert_eq!(refs[1]["resolved"], false);
        assert!(refs[1].get("galleryId").is_none());
    }
}
