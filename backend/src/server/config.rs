//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Vec<u8>,
    pub(crate) upload_dir: PathBuf,
    pub(crate) welcome_image_dir: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        jwt_secret: Vec<u8>,
        upload_dir: impl Into<PathBuf>,
        welcome_image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            upload_dir: upload_dir.into(),
            welcome_image_dir: welcome_image_dir.into(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
