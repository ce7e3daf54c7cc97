//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every content and account endpoint, the wire schemas,
//! and the bearer-token security scheme. The generated specification backs
//! Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::documents::DocumentUpsertRequest;
use crate::inbound::http::galleries::GalleryUpsertRequest;
use crate::inbound::http::images::UploadResponse;
use crate::inbound::http::pages::PageUpdateRequest;
use crate::inbound::http::schemas::{
    DocumentDto, GalleryDto, GalleryReferenceDto, PageDto, SuccessResponse,
};
use crate::inbound::http::users::{CredentialsRequest, LoginResponse};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /user/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Sharkdown backend API",
        description = "HTTP interface for authoring markdown documents with embedded image galleries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::documents::upsert_document,
        crate::inbound::http::documents::delete_document,
        crate::inbound::http::documents::list_documents,
        crate::inbound::http::documents::get_document,
        crate::inbound::http::galleries::upsert_gallery,
        crate::inbound::http::galleries::delete_gallery,
        crate::inbound::http::galleries::get_gallery,
        crate::inbound::http::pages::create_page,
        crate::inbound::http::pages::update_page,
        crate::inbound::http::pages::delete_page,
        crate::inbound::http::pages::page_references,
        crate::inbound::http::images::upload_image,
        crate::inbound::http::images::delete_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CredentialsRequest,
        LoginResponse,
        DocumentUpsertRequest,
        GalleryUpsertRequest,
        PageUpdateRequest,
        UploadResponse,
        DocumentDto,
        GalleryDto,
        PageDto,
        GalleryReferenceDto,
        SuccessResponse,
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "documents", description = "Markdown document management"),
        (name = "pages", description = "Document pages and gallery references"),
        (name = "galleries", description = "Image galleries within documents"),
        (name = "images", description = "Image uploads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
