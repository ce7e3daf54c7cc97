//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::path::PathBuf;
use std::sync::Arc;

use actix_files::Files;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::TokenService;
use crate::domain::{AccountService, ContentService};
use crate::inbound::http::documents::{
    delete_document, get_document, list_documents, upsert_document,
};
use crate::inbound::http::galleries::{delete_gallery, get_gallery, upsert_gallery};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::images::{delete_image, upload_image};
use crate::inbound::http::pages::{create_page, delete_page, page_references, update_page};
use crate::inbound::http::users::{login, register};
use crate::inbound::http::HttpState;
use crate::middleware::Trace;
use crate::outbound::blobstore::FsImageStore;
use crate::outbound::credentials::{Argon2PasswordHasher, JwtTokenService};
use crate::outbound::persistence::{DieselContentRepository, DieselUserRepository};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    upload_dir: PathBuf,
    welcome_image_dir: PathBuf,
}

/// Build the shared HTTP state from pool-backed adapters.
fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let pool = config
        .db_pool
        .clone()
        .ok_or_else(|| std::io::Error::other("database pool not configured"))?;

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let content_repo = Arc::new(DieselContentRepository::new(pool));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(&config.jwt_secret));
    let images = Arc::new(FsImageStore::new(config.upload_dir.clone()));

    let accounts = AccountService::new(users, hasher, Arc::clone(&tokens));
    let content = ContentService::new(content_repo, images);
    Ok(web::Data::new(HttpState::new(accounts, content, tokens)))
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        upload_dir,
        welcome_image_dir,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
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
        .service(delete_image)
        .service(Files::new("/images", upload_dir))
        .service(Files::new("/welcomeImages", welcome_image_dir))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when state construction, directory
/// preparation, or binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    std::fs::create_dir_all(&config.upload_dir)?;

    let server_health_state = health_state.clone();
    let upload_dir = config.upload_dir.clone();
    let welcome_image_dir = config.welcome_image_dir.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            upload_dir: upload_dir.clone(),
            welcome_image_dir: welcome_image_dir.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
