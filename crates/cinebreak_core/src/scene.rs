//! Scenes of the breakdown.

use crate::Shot;
use serde::{Deserialize, Serialize};

/// Opaque scene label.
///
/// Screenplays number scenes "12", "12A" or plain integers; the label is kept
/// in whichever JSON form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(untagged)]
pub enum SceneNumber {
    /// Integer label
    #[display("{}", _0)]
    Number(i64),
    /// Text label
    #[display("{}", _0)]
    Label(String),
}

impl From<i64> for SceneNumber {
    fn from(value: i64) -> Self {
        SceneNumber::Number(value)
    }
}

impl From<&str> for SceneNumber {
    fn from(value: &str) -> Self {
        SceneNumber::Label(value.to_string())
    }
}

/// One scene of the screenplay with its production data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene label
    pub scene_number: SceneNumber,
    /// Slug line, e.g. "INT. IGREJA - NOITE"
    pub header: String,
    /// Location name
    pub location: String,
    /// Time of day as written
    pub time: String,
    /// Names of characters present; soft references into the registry
    #[serde(default)]
    pub characters: Vec<String>,
    /// Explicit and inferred props
    #[serde(default)]
    pub props: Vec<String>,
    /// Short summary of the action
    #[serde(default)]
    pub summary: String,
    /// Estimated screen time
    #[serde(
        rename = "estimated_duration_mins",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_duration_minutes: Option<f64>,
    /// Shot list in screen order; empty until generated
    #[serde(default)]
    pub shots: Vec<Shot>,
    /// Master concept art for the whole scene
    #[serde(rename = "sceneImageUrl", default, skip_serializing_if = "Option::is_none")]
    pub scene_image_url: Option<String>,
}

impl Scene {
    /// Whether a shot list has been generated for this scene.
    pub fn has_shots(&self) -> bool {
        !self.shots.is_empty()
    }

    /// Look up a shot by its number.
    pub fn shot_mut(&mut self, shot_number: u32) -> Option<&mut Shot> {
        self.shots.iter_mut().find(|s| s.shot_number == shot_number)
    }
}
