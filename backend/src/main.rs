//! Backend entry-point: wires the REST endpoints, static image mounts, and
//! OpenAPI docs on top of PostgreSQL-backed adapters.

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use sharkdown_backend::inbound::http::health::HealthState;
use sharkdown_backend::outbound::persistence::{DbPool, PoolConfig};
use sharkdown_backend::server::{create_server, ServerConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Load the JWT signing secret from `JWT_SECRET` or `JWT_SECRET_FILE`.
///
/// Release builds refuse to start without one; debug builds (or
/// `AUTH_ALLOW_EPHEMERAL=1`) fall back to a random per-process secret so
/// local development does not need a secret mount.
fn load_jwt_secret() -> std::io::Result<Vec<u8>> {
    if let Ok(secret) = env::var("JWT_SECRET") {
        return Ok(secret.into_bytes());
    }
    let secret_path =
        env::var("JWT_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/jwt_secret".into());
    match std::fs::read(&secret_path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let allow_dev = env::var("AUTH_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %secret_path, error = %e, "using temporary JWT secret (dev only)");
                Ok(uuid::Uuid::new_v4().into_bytes().to_vec())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read JWT secret at {secret_path}: {e}"
                )))
            }
        }
    }
}

/// Run pending schema migrations on a blocking connection.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = diesel::PgConnection::establish(&database_url)
            .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
        Ok(())
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;
    let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
    let welcome_image_dir =
        env::var("WELCOME_IMAGE_DIR").unwrap_or_else(|_| "welcome-images".into());
    let jwt_secret = load_jwt_secret()?;

    run_migrations(database_url.clone()).await?;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("pool construction failed: {e}")))?;

    let config = ServerConfig::new(bind_addr, jwt_secret, upload_dir, welcome_image_dir)
        .with_db_pool(pool);

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
