//! File-backed persistence for cinebreak.
//!
//! Two stores live here:
//!
//! - [`FileSystemSnapshotStore`]: the project history, a single JSON file
//!   holding the last few analyzed documents, newest first
//! - [`ImageArchive`]: storyboard frames decoded from `data:` URIs and stored
//!   under their SHA-256 hash, so identical frames are written once
//!
//! # Example
//!
//! ```rust,no_run
//! use cinebreak_core::BreakdownDocument;
//! use cinebreak_interface::{ProjectSnapshot, SnapshotStore};
//! use cinebreak_storage::FileSystemSnapshotStore;
//!
//! # async fn example() -> cinebreak_error::CinebreakResult<()> {
//! let history = FileSystemSnapshotStore::in_dir("/tmp/cinebreak")?;
//! history.save(ProjectSnapshot::new(BreakdownDocument::default())).await?;
//! assert_eq!(history.load_all().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod history;

pub use archive::{ArchivedImage, ImageArchive, decode_data_uri, extension_for};
pub use history::{DEFAULT_HISTORY_LIMIT, FileSystemSnapshotStore, HISTORY_FILE_NAME};
