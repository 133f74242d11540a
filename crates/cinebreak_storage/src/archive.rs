//! Content-addressed archive for storyboard frames.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cinebreak_core::ImageHandle;
use cinebreak_error::{
    CinebreakResult, ImageError, ImageErrorKind, StorageError, StorageErrorKind,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Where an archived frame lives and what it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedImage {
    /// SHA-256 of the image bytes, lowercase hex
    pub content_hash: String,
    /// File holding the bytes
    pub path: PathBuf,
    /// MIME type taken from the data URI
    pub mime_type: String,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Image store laid out as `{base}/{hash[0:2]}/{hash[2:4]}/{hash}.{ext}`.
///
/// Identical frames hash to the same path and are written once. Writes go
/// through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct ImageArchive {
    base_path: PathBuf,
}

impl ImageArchive {
    /// Open an archive rooted at `base_path`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> CinebreakResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened image archive");
        Ok(Self { base_path })
    }

    /// Archive root.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn path_for(&self, hash: &str, mime_type: &str) -> PathBuf {
        self.base_path
            .join(&hash[0..2])
            .join(&hash[2..4])
            .join(format!("{}.{}", hash, extension_for(mime_type)))
    }

    /// Archive an image handle.
    ///
    /// Inline frames are decoded and stored; remote URLs are not fetched and
    /// yield `None`.
    ///
    /// # Errors
    ///
    /// `ImageError` (`InvalidDataUri`) for a malformed data URI, `StorageError`
    /// if the file cannot be written.
    pub async fn store(&self, handle: &ImageHandle) -> CinebreakResult<Option<ArchivedImage>> {
        match handle {
            ImageHandle::DataUri(uri) => {
                let (mime_type, data) = decode_data_uri(uri)?;
                self.store_bytes(&data, &mime_type).await.map(Some)
            }
            ImageHandle::Url(url) => {
                tracing::debug!(url = %url, "Remote image not archived");
                Ok(None)
            }
        }
    }

    /// Store raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a directory or the file cannot be written.
    #[tracing::instrument(skip(self, data), fields(size = data.len(), mime = %mime_type))]
    pub async fn store_bytes(&self, data: &[u8], mime_type: &str) -> CinebreakResult<ArchivedImage> {
        let hash = Self::compute_hash(data);
        let path = self.path_for(&hash, mime_type);
        let archived = ArchivedImage {
            content_hash: hash.clone(),
            path: path.clone(),
            mime_type: mime_type.to_string(),
            size_bytes: data.len() as u64,
        };

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(hash = %hash, "Image already archived");
            return Ok(archived);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;
        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(hash = %hash, path = %path.display(), "Archived image");
        Ok(archived)
    }

    /// Read an archived image back, verifying its hash.
    ///
    /// # Errors
    ///
    /// `StorageError` (`NotFound`) if the file is gone, `FileRead` on I/O
    /// failure or if the bytes no longer match the hash.
    #[tracing::instrument(skip(self, image), fields(hash = %image.content_hash))]
    pub async fn retrieve(&self, image: &ArchivedImage) -> CinebreakResult<Vec<u8>> {
        let data = tokio::fs::read(&image.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(image.path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    image.path.display(),
                    e
                )))
            }
        })?;

        let actual = Self::compute_hash(&data);
        if actual != image.content_hash {
            return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "Hash mismatch: expected {}, got {}",
                image.content_hash, actual
            )))
            .into());
        }
        Ok(data)
    }
}

/// Split a `data:{mime};base64,{payload}` URI into MIME type and bytes.
///
/// # Errors
///
/// Returns `ImageError` (`InvalidDataUri`) for anything else.
pub fn decode_data_uri(uri: &str) -> CinebreakResult<(String, Vec<u8>)> {
    let invalid = |reason: &str| ImageError::new(ImageErrorKind::InvalidDataUri(reason.to_string()));

    let rest = uri.strip_prefix("data:").ok_or_else(|| invalid("missing data: prefix"))?;
    let (header, payload) = rest.split_once(',').ok_or_else(|| invalid("missing payload"))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("payload is not base64"))?;
    if mime_type.is_empty() {
        return Err(invalid("missing MIME type").into());
    }

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| invalid(&e.to_string()))?;
    Ok((mime_type.to_string(), data))
}

/// File extension for an image MIME type.
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}
