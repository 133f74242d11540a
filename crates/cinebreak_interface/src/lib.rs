//! Capability traits for the cinebreak pipeline.
//!
//! Stages depend on these traits only. Concrete transports live in
//! `cinebreak_models`, the file-backed history in `cinebreak_storage`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod snapshot;
mod traits;

pub use snapshot::ProjectSnapshot;
pub use traits::{ImageTransport, ModelTransport, SnapshotStore};
