//! Gallery endpoints.
//!
//! ```text
//! POST /gallery          {"name":"Pets","markdownDocumentId":"<uuid>"}
//! POST /gallery/delete   ?galleryId=<uuid>
//! GET  /gallery          ?galleryId=<uuid>
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::content::{ContentValidationError, GalleryName, GalleryUpsert};
use crate::domain::{DocumentId, Error, GalleryId};

use super::auth::AuthenticatedUser;
use super::schemas::{DocumentDto, GalleryDto};
use super::state::HttpState;
use super::ApiResult;

/// Body of `POST /gallery`: absent `id` creates in `markdownDocumentId`,
/// present `id` renames.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryUpsertRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GalleryId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_document_id: Option<DocumentId>,
}

/// Query of the delete and fetch endpoints.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct GalleryIdQuery {
    pub gallery_id: GalleryId,
}

fn map_name_error(err: ContentValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
}

fn into_upsert(request: GalleryUpsertRequest) -> ApiResult<GalleryUpsert> {
    let name = GalleryName::new(request.name).map_err(map_name_error)?;
    match (request.id, request.markdown_document_id) {
        (Some(id), _) => Ok(GalleryUpsert::Update { id, name }),
        (None, Some(document_id)) => Ok(GalleryUpsert::Create { document_id, name }),
        (None, None) => Err(Error::invalid_request(
            "either id or markdownDocumentId is required",
        )),
    }
}

/// Create a gallery in an owned document or rename an owned gallery.
#[utoipa::path(
    post,
    path = "/gallery",
    request_body = GalleryUpsertRequest,
    responses(
        (status = 200, description = "Gallery with image paths", body = GalleryDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown id", body = Error),
        (status = 409, description = "Name already used in this document", body = Error)
    ),
    tags = ["galleries"],
    operation_id = "upsertGallery"
)]
#[post("/gallery")]
pub async fn upsert_gallery(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<GalleryUpsertRequest>,
) -> ApiResult<web::Json<GalleryDto>> {
    let request = into_upsert(payload.into_inner())?;
    let assembled = state.content.upsert_gallery(&user.id(), request).await?;
    Ok(web::Json(GalleryDto::from(assembled)))
}

/// Delete an owned gallery and its images; returns the owning document
/// reassembled.
#[utoipa::path(
    post,
    path = "/gallery/delete",
    params(GalleryIdQuery),
    responses(
        (status = 200, description = "Owning document after deletion", body = DocumentDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown gallery id", body = Error)
    ),
    tags = ["galleries"],
    operation_id = "deleteGallery"
)]
#[post("/gallery/delete")]
pub async fn delete_gallery(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<GalleryIdQuery>,
) -> ApiResult<web::Json<DocumentDto>> {
    let document = state
        .content
        .delete_gallery(&user.id(), &query.gallery_id)
        .await?;
    Ok(web::Json(DocumentDto::from(document)))
}

/// Fetch one owned gallery with its image paths.
#[utoipa::path(
    get,
    path = "/gallery",
    params(GalleryIdQuery),
    responses(
        (status = 200, description = "Gallery with image paths", body = GalleryDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "Unknown gallery id", body = Error)
    ),
    tags = ["galleries"],
    operation_id = "getGallery"
)]
#[get("/gallery")]
pub async fn get_gallery(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<GalleryIdQuery>,
) -> ApiResult<web::Json<GalleryDto>> {
    let assembled = state.content.get_gallery(&user.id(), &query.gallery_id).await?;
    Ok(web::Json(GalleryDto::from(assembled)))
}
