//! Project files on disk.

use cinebreak::{BreakdownDocument, CinebreakResult, StorageError, StorageErrorKind};
use std::path::Path;

/// Read a project file.
pub async fn read_project(path: &Path) -> CinebreakResult<BreakdownDocument> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
        } else {
            StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
        }
    })?;
    BreakdownDocument::from_json(&json)
}

/// Write a project file, or print it when `path` is `None`.
pub async fn write_project(path: Option<&Path>, document: &BreakdownDocument) -> CinebreakResult<()> {
    let json = document.to_json()?;
    match path {
        Some(path) => {
            tokio::fs::write(path, json).await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
            })?;
            tracing::info!(path = %path.display(), "Project written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
