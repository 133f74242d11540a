//! Shot list entries.

use serde::{Deserialize, Serialize};

/// One planned camera setup within a scene.
///
/// Camera grammar (`size`, `angle`, `movement`) is free text. `visual_prompt`
/// is always English and feeds the image adapter; `image_url` holds the last
/// image rendered from that exact prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    /// 1-based position within the scene
    pub shot_number: u32,
    /// Shot size, e.g. "Close-Up (CU)"
    pub size: String,
    /// Camera angle, e.g. "Low Angle"
    pub angle: String,
    /// Camera movement, e.g. "Dolly In"
    pub movement: String,
    /// Who or what is the focus
    pub subject: String,
    /// Action in this shot, in the production language
    pub description: String,
    /// What is visible behind the subject
    #[serde(default)]
    pub background_details: String,
    /// English prompt for storyboard image generation
    pub visual_prompt: String,
    /// Data URI or URL of the rendered storyboard frame
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Shot {
    /// Replace the prompt and drop the image rendered from the old one.
    ///
    /// Returns `false` and leaves the shot untouched when the prompt is unchanged.
    pub fn rewrite_prompt(&mut self, prompt: impl Into<String>) -> bool {
        let prompt = prompt.into();
        if prompt == self.visual_prompt {
            return false;
        }
        self.visual_prompt = prompt;
        self.image_url = None;
        true
    }
}
