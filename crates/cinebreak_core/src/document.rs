//! The breakdown document, root aggregate of the pipeline.

use crate::{Character, Scene};
use cinebreak_error::{CinebreakResult, JsonError};
use serde::{Deserialize, Serialize};

/// Structured production document derived from a screenplay.
///
/// This is also the project file format: [`BreakdownDocument::to_json`] and
/// [`BreakdownDocument::from_json`] round-trip losslessly, including keys this
/// version does not interpret (kept in `extensions`).
///
/// # Examples
///
/// ```
/// use cinebreak_core::BreakdownDocument;
///
/// let json = r#"{"title": "O Casamento", "scenes": []}"#;
/// let doc = BreakdownDocument::from_json(json).unwrap();
/// assert_eq!(doc.title, "O Casamento");
/// assert!(doc.characters.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakdownDocument {
    /// Project title
    #[serde(default)]
    pub title: String,
    /// Screenplay author
    #[serde(default)]
    pub author: String,
    /// One-sentence summary
    #[serde(default)]
    pub logline: String,
    /// Scene count reported at analysis time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_scenes: Option<u32>,
    /// Scenes in screenplay order
    pub scenes: Vec<Scene>,
    /// Character registry keyed by name
    #[serde(rename = "characters_metadata", default)]
    pub characters: Vec<Character>,
    /// Locations found at analysis time
    #[serde(default)]
    pub unique_locations: Vec<String>,
    /// Keys written by other tools, preserved verbatim
    #[serde(flatten)]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl BreakdownDocument {
    /// Parse a project file.
    ///
    /// # Errors
    ///
    /// Returns a `JsonError` if the text is not a breakdown document.
    pub fn from_json(json: &str) -> CinebreakResult<Self> {
        let doc: Self = serde_json::from_str(json).map_err(|e| {
            tracing::error!(error = %e, "Project file is not a breakdown document");
            JsonError::new(format!("Invalid project file: {}", e))
        })?;
        Ok(doc)
    }

    /// Serialize as a pretty-printed project file.
    ///
    /// # Errors
    ///
    /// Returns a `JsonError` if serialization fails.
    pub fn to_json(&self) -> CinebreakResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| JsonError::new(format!("Failed to serialize document: {}", e)).into())
    }

    /// Find a registry entry by exact name.
    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Mutable registry lookup by exact name.
    pub fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.name == name)
    }

    /// Indices of scenes that already have a shot list, in screenplay order.
    pub fn scenes_with_shots(&self) -> Vec<usize> {
        self.scenes
            .iter()
            .enumerate()
            .filter(|(_, scene)| scene.has_shots())
            .map(|(index, _)| index)
            .collect()
    }

    /// Total number of shots across all scenes.
    pub fn shot_count(&self) -> usize {
        self.scenes.iter().map(|s| s.shots.len()).sum()
    }
}
