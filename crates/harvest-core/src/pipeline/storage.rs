//! Content-addressed storage of accepted images.

use std::path::PathBuf;

use crate::error::PipelineError;
use crate::types::{AcceptedImage, FetchedImage};

use super::hash::Hasher;
use super::quality::ImageDimensions;

/// Extension used when the content type is missing or unrecognized.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Map a declared content type to a file extension.
///
/// Best-effort: the payload is not sniffed, so a mislabeled response gets
/// a wrong extension but byte-correct content. MIME parameters are ignored.
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let Some(content_type) = content_type else {
        return DEFAULT_EXTENSION;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        _ => DEFAULT_EXTENSION,
    }
}

/// Writes accepted payloads under a base directory, named by content hash.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `root`. The directory is not created here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Hash, name and write a payload that already passed the quality gate.
    ///
    /// Existing files with the same name are overwritten; since the name is
    /// derived from the bytes, the overwrite is a no-op in content.
    pub async fn persist(
        &self,
        fetched: FetchedImage,
        dims: ImageDimensions,
    ) -> Result<AcceptedImage, PipelineError> {
        let FetchedImage {
            bytes,
            content_type,
            source_url,
        } = fetched;

        // Payloads can be tens of megabytes; keep hashing off the runtime workers.
        let (bytes, content_hash) = tokio::task::spawn_blocking(move || {
            let hash = Hasher::content_hash_from_bytes(&bytes);
            (bytes, hash)
        })
        .await
        .map_err(|e| PipelineError::Storage {
            url: source_url.clone(),
            path: self.root.clone(),
            message: format!("Hash task join error: {}", e),
        })?;

        let extension = extension_for_content_type(content_type.as_deref());
        let filename = format!("{content_hash}{extension}");
        let file_path = self.root.join(&filename);

        tokio::fs::write(&file_path, &bytes)
            .await
            .map_err(|e| PipelineError::Storage {
                url: source_url.clone(),
                path: file_path.clone(),
                message: e.to_string(),
            })?;

        tracing::trace!("  Wrote {} bytes to {:?}", bytes.len(), file_path);

        Ok(AcceptedImage {
            filename,
            file_path,
            source_url,
            size_bytes: bytes.len() as u64,
            content_hash,
            extension: extension.to_string(),
            width: dims.width,
            height: dims.height,
        })
    }
}
