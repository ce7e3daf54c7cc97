//! Filesystem image blob storage.
//!
//! Stores uploads in a flat directory under unique, timestamp-prefixed
//! names. The directory is expected to be served statically under
//! `/images`, which is the public path recorded against each blob.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::ports::{ImageStore, ImageStoreError, StoredImage};

/// URL prefix under which stored images are served.
pub const IMAGE_PUBLIC_PREFIX: &str = "/images";

/// Image store writing blobs to a local directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory blobs are written to; the static file mount serves this.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Reduce an uploaded filename to its final path component, rejecting names
/// that carry no usable component at all.
fn sanitize_filename(original: &str) -> Result<String, ImageStoreError> {
    let trimmed = original.trim();
    if trimmed.is_empty() {
        return Err(ImageStoreError::invalid_filename(
            "filename must not be empty",
        ));
    }
    let base = Path::new(trimmed)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ImageStoreError::invalid_filename(format!("no usable filename in {trimmed:?}"))
        })?;
    Ok(base.to_owned())
}

fn unique_name(sanitized: &str) -> String {
    format!("{}-{sanitized}", chrono::Utc::now().timestamp_millis())
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(
        &self,
        original_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredImage, ImageStoreError> {
        let sanitized = sanitize_filename(original_filename)?;
        let filename = unique_name(&sanitized);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| ImageStoreError::write(err.to_string()))?;
        tokio::fs::write(self.root.join(&filename), bytes)
            .await
            .map_err(|err| ImageStoreError::write(err.to_string()))?;

        let public_path = format!("{IMAGE_PUBLIC_PREFIX}/{filename}");
        Ok(StoredImage {
            filename,
            public_path,
        })
    }

    async fn remove(&self, filename: &str) -> Result<(), ImageStoreError> {
        // Stored names never contain separators; reject anything that does
        // rather than follow it out of the root.
        let sanitized = sanitize_filename(filename)?;
        if sanitized != filename {
            return Err(ImageStoreError::invalid_filename(format!(
                "{filename:?} is not a stored filename"
            )));
        }

        match tokio::fs::remove_file(self.root.join(&sanitized)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ImageStoreError::remove(err.to_string())),
        }
    }
}
