//! Project history backed by one JSON file.

use async_trait::async_trait;
use cinebreak_error::{CinebreakResult, StorageError, StorageErrorKind};
use cinebreak_interface::{ProjectSnapshot, SnapshotStore};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Snapshots kept when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// File name used by [`FileSystemSnapshotStore::in_dir`].
pub const HISTORY_FILE_NAME: &str = "history.json";

/// Snapshot store holding the last N projects in a single JSON array.
///
/// - Newest first
/// - Saving a title that is already present replaces the older entry
/// - Writes go to a temp file that is renamed over the history file
/// - A history file that cannot be parsed reads as empty and is overwritten on
///   the next save
pub struct FileSystemSnapshotStore {
    path: PathBuf,
    limit: usize,
    write_lock: Mutex<()>,
}

impl FileSystemSnapshotStore {
    /// Store backed by the file at `path`. Nothing is created until the first
    /// save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            limit: DEFAULT_HISTORY_LIMIT,
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by [`HISTORY_FILE_NAME`] inside `dir`, creating `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    #[tracing::instrument(skip(dir))]
    pub fn in_dir(dir: impl AsRef<Path>) -> CinebreakResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;
        tracing::debug!(path = %dir.display(), "History directory ready");
        Ok(Self::new(dir.join(HISTORY_FILE_NAME)))
    }

    /// Keep at most `limit` snapshots (at least one).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maximum number of snapshots kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    async fn read(&self) -> CinebreakResult<Vec<ProjectSnapshot>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
                .into());
            }
        };

        match serde_json::from_str(&text) {
            Ok(snapshots) => Ok(snapshots),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History file is corrupt; starting with empty history"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write(&self, snapshots: &[ProjectSnapshot]) -> CinebreakResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let json = serde_json::to_string_pretty(snapshots)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            )))
        })?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for FileSystemSnapshotStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_all(&self) -> CinebreakResult<Vec<ProjectSnapshot>> {
        let snapshots = self.read().await?;
        tracing::debug!(count = snapshots.len(), "Loaded project history");
        Ok(snapshots)
    }

    #[tracing::instrument(skip(self, snapshot), fields(title = %snapshot.title, id = %snapshot.id))]
    async fn save(&self, snapshot: ProjectSnapshot) -> CinebreakResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut snapshots = self.read().await?;
        snapshots.retain(|s| s.title != snapshot.title);
        snapshots.insert(0, snapshot);
        snapshots.truncate(self.limit);

        self.write(&snapshots).await?;
        tracing::info!(count = snapshots.len(), "Saved project snapshot");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CinebreakResult<bool> {
        let _guard = self.write_lock.lock().await;

        let mut snapshots = self.read().await?;
        let before = snapshots.len();
        snapshots.retain(|s| s.id != id);
        if snapshots.len() == before {
            return Ok(false);
        }

        self.write(&snapshots).await?;
        tracing::info!("Deleted project snapshot");
        Ok(true)
    }
}

impl std::fmt::Debug for FileSystemSnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystemSnapshotStore")
            .field("path", &self.path)
            .field("limit", &self.limit)
            .finish()
    }
}
