//! Document endpoints.
//!
//! ```text
//! POST /document          {"id":null,"title":"My Notes"}
//! POST /document/delete   ?markdownDocumentId=<uuid>
//! GET  /documents/all
//! GET  /document          ?id=<uuid>
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::content::{ContentValidationError, DocumentTitle, DocumentUpsert};
use crate::domain::{DocumentId, Error};

use super::auth::AuthenticatedUser;
use super::schemas::{DocumentDto, SuccessResponse};
use super::state::HttpState;
use super::ApiResult;

/// Body of `POST /document`: absent `id` creates, present `id` retitles.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpsertRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub title: String,
}

/// Query of delete-by-id endpoints.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIdQuery {
    pub markdown_document_id: DocumentId,
}

/// Query of `GET /document`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DocumentQuery {
    pub id: DocumentId,
}

fn map_title_error(err: ContentValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "title" }))
}

/// Create a document (with one default page) or retitle an owned one.
#[utoipa::path(
    post,
    path = "/document",
    request_body = DocumentUpsertRequest,
    responses(
        (status = 201, description = "Document created", body = DocumentDto),
        (status = 200, description = "Document updated", body = DocumentDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown document id", body = Error)
    ),
    tags = ["documents"],
    operation_id = "upsertDocument"
)]
#[post("/document")]
pub async fn upsert_document(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<DocumentUpsertRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let title = DocumentTitle::new(payload.title).map_err(map_title_error)?;
    let request = match payload.id {
        None => DocumentUpsert::Create {
            title,
            with_default_page: true,
        },
        Some(id) => DocumentUpsert::Update { id, title },
    };
    let outcome = state.content.upsert_document(&user.id(), request).await?;
    let body = DocumentDto::from(outcome.document);
    if outcome.created {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

/// Delete an owned document and all of its pages, galleries, and images.
#[utoipa::path(
    post,
    path = "/document/delete",
    params(DocumentIdQuery),
    responses(
        (status = 200, description = "Deleted (or already absent)", body = SuccessResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error)
    ),
    tags = ["documents"],
    operation_id = "deleteDocument"
)]
#[post("/document/delete")]
pub async fn delete_document(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<DocumentIdQuery>,
) -> ApiResult<web::Json<SuccessResponse>> {
    state
        .content
        .delete_document(&user.id(), &query.markdown_document_id)
        .await?;
    Ok(web::Json(SuccessResponse::new()))
}

/// List the caller's documents as summaries with empty `pages`/`galleries`.
#[utoipa::path(
    get,
    path = "/documents/all",
    responses(
        (status = 200, description = "Document summaries", body = [DocumentDto]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["documents"],
    operation_id = "listDocuments"
)]
#[get("/documents/all")]
pub async fn list_documents(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DocumentDto>>> {
    let documents = state.content.list_documents(&user.id()).await?;
    Ok(web::Json(
        documents.into_iter().map(DocumentDto::from).collect(),
    ))
}

/// Fetch one owned document with its pages and galleries.
#[utoipa::path(
    get,
    path = "/document",
    params(DocumentQuery),
    responses(
        (status = 200, description = "Assembled document", body = DocumentDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown document id", body = Error)
    ),
    tags = ["documents"],
    operation_id = "getDocument"
)]
#[get("/document")]
pub async fn get_document(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<DocumentQuery>,
) -> ApiResult<web::Json<DocumentDto>> {
    let assembled = state.content.get_document(&user.id(), &query.id).await?;
    Ok(web::Json(DocumentDto::from(assembled)))
}
