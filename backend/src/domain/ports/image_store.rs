//! Capability port for image blob storage.
//!
//! The content store only records public paths; the bytes themselves go
//! through this port. The production adapter writes to a local directory
//! served by the static `/images` mount.

use async_trait::async_trait;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by blob storage adapters.
    pub enum ImageStoreError {
        /// The upload could not be written.
        Write { message: String } => "image write failed: {message}",
        /// The stored file could not be removed.
        Remove { message: String } => "image removal failed: {message}",
        /// The original filename is empty or unusable.
        InvalidFilename { message: String } => "invalid image filename: {message}",
    }
}

/// A stored image: the unique filename and the public path clients use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub filename: String,
    pub public_path: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist uploaded bytes under a unique name derived from
    /// `original_filename`.
    async fn save(
        &self,
        original_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredImage, ImageStoreError>;

    /// Remove a previously stored file. Unknown names are a no-op so image
    /// deletion stays idempotent with the row delete.
    async fn remove(&self, filename: &str) -> Result<(), ImageStoreError>;
}
