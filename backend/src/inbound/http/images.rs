//! Image upload and deletion endpoints.
//!
//! ```text
//! POST /upload        multipart fields: image (file), galleryId (text)
//! POST /image/delete  ?filename=<stored filename>
//! ```

use actix_multipart::Multipart;
use actix_web::{post, web};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, GalleryId};

use super::auth::AuthenticatedUser;
use super::schemas::SuccessResponse;
use super::state::HttpState;
use super::ApiResult;

/// Response of `POST /upload`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Stored filename; pass it to `POST /image/delete`.
    pub filename: String,
    /// Public path for embedding, e.g. `/images/169...-photo.jpg`.
    pub image_path: String,
}

/// Query of `POST /image/delete`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ImageDeleteQuery {
    pub filename: String,
}

struct UploadParts {
    original_filename: String,
    bytes: Vec<u8>,
    gallery_id: GalleryId,
}

fn map_multipart_error(err: actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart payload: {err}"))
}

async fn read_upload(mut payload: Multipart) -> ApiResult<UploadParts> {
    let mut image: Option<(String, Vec<u8>)> = None;
    let mut gallery_id: Option<GalleryId> = None;

    while let Some(mut field) = payload.try_next().await.map_err(map_multipart_error)? {
        let Some(name) = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .map(str::to_owned)
        else {
            continue;
        };
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(map_multipart_error)? {
            bytes.extend_from_slice(&chunk);
        }
        match name.as_str() {
            "image" => {
                let is_image = field
                    .content_type()
                    .is_some_and(|mime| mime.type_() == "image");
                if !is_image {
                    return Err(Error::invalid_request(
                        "the image field must carry an image/* content type",
                    ));
                }
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_owned)
                    .ok_or_else(|| Error::invalid_request("image field has no filename"))?;
                image = Some((filename, bytes));
            }
            "galleryId" => {
                let raw = String::from_utf8(bytes)
                    .map_err(|_| Error::invalid_request("galleryId must be UTF-8 text"))?;
                let parsed = raw
                    .trim()
                    .parse()
                    .map_err(|_| Error::invalid_request("galleryId must be a UUID"))?;
                gallery_id = Some(GalleryId::from_uuid(parsed));
            }
            _ => {}
        }
    }

    let (original_filename, bytes) =
        image.ok_or_else(|| Error::invalid_request("no file uploaded"))?;
    let gallery_id =
        gallery_id.ok_or_else(|| Error::invalid_request("galleryId field missing"))?;
    Ok(UploadParts {
        original_filename,
        bytes,
        gallery_id,
    })
}

/// Store an uploaded image and append it to an owned gallery.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored image", body = UploadResponse),
        (status = 400, description = "Invalid multipart payload", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Gallery owned by another user", body = Error),
        (status = 404, description = "Unknown gallery id", body = Error)
    ),
    tags = ["images"],
    operation_id = "uploadImage"
)]
#[post("/upload")]
pub async fn upload_image(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<web::Json<UploadResponse>> {
    let parts = read_upload(payload).await?;
    let stored = state
        .content
        .upload_image(
            &user.id(),
            &parts.gallery_id,
            &parts.original_filename,
            parts.bytes,
        )
        .await?;
    Ok(web::Json(UploadResponse {
        filename: stored.filename,
        image_path: stored.public_path,
    }))
}

/// Delete an image row by stored filename and remove the file.
#[utoipa::path(
    post,
    path = "/image/delete",
    params(ImageDeleteQuery),
    responses(
        (status = 200, description = "Deleted (or already absent)", body = SuccessResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Gallery owned by another user", body = Error)
    ),
    tags = ["images"],
    operation_id = "deleteImage"
)]
#[post("/image/delete")]
pub async fn delete_image(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<ImageDeleteQuery>,
) -> ApiResult<web::Json<SuccessResponse>> {
    state.content.delete_image(&user.id(), &query.filename).await?;
    Ok(web::Json(SuccessResponse::new()))
}
