//! In-memory snapshot store.

use async_trait::async_trait;
use cinebreak_error::{CinebreakResult, StorageError, StorageErrorKind};
use cinebreak_interface::{ProjectSnapshot, SnapshotStore};
use std::sync::Mutex;
use uuid::Uuid;

/// Snapshot store that keeps everything in a vector, newest first.
#[derive(Default)]
pub struct MemoryHistory {
    snapshots: Mutex<Vec<ProjectSnapshot>>,
    fail_writes: bool,
}

impl MemoryHistory {
    /// A store whose saves always fail.
    pub fn read_only() -> Self {
        Self {
            snapshots: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }
}

#[async_trait]
impl SnapshotStore for MemoryHistory {
    async fn load_all(&self) -> CinebreakResult<Vec<ProjectSnapshot>> {
        Ok(self.snapshots.lock().unwrap().clone())
    }

    async fn save(&self, snapshot: ProjectSnapshot) -> CinebreakResult<()> {
        if self.fail_writes {
            return Err(StorageError::new(StorageErrorKind::FileWrite("read-only".into())).into());
        }
        self.snapshots.lock().unwrap().insert(0, snapshot);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> CinebreakResult<bool> {
        let mut snapshots = self.snapshots.lock().unwrap();
        let before = snapshots.len();
        snapshots.retain(|s| s.id != id);
        Ok(snapshots.len() != before)
    }
}
