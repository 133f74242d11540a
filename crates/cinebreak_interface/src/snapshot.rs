//! Saved project snapshots.

use chrono::{DateTime, Utc};
use cinebreak_core::BreakdownDocument;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the project history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Unique snapshot id
    pub id: Uuid,
    /// Document title at save time; the history's upsert key
    pub title: String,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
    /// The saved document
    pub document: BreakdownDocument,
}

impl ProjectSnapshot {
    /// Snapshot a document now, with a fresh id.
    pub fn new(document: BreakdownDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: document.title.clone(),
            saved_at: Utc::now(),
            document,
        }
    }
}
