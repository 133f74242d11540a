//! Storyboard image styles and handles.

use serde::{Deserialize, Serialize};

/// Rendering style for storyboard frames.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum ImageStyle {
    /// Black and white charcoal sketch
    #[default]
    #[serde(rename = "BW_SKETCH")]
    #[strum(to_string = "sketch", serialize = "bw_sketch")]
    Sketch,
    /// Colour digital concept art
    #[strum(to_string = "color", serialize = "color_storyboard", serialize = "colour")]
    ColorStoryboard,
    /// Photorealistic film still
    #[strum(to_string = "realistic")]
    Realistic,
}

impl ImageStyle {
    /// Literal text placed in front of every prompt rendered in this style.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinebreak_core::ImageStyle;
    ///
    /// assert!(ImageStyle::Sketch.prefix().starts_with("Rough charcoal"));
    /// assert!(ImageStyle::Realistic.prefix().contains("35mm"));
    /// ```
    pub fn prefix(&self) -> &'static str {
        match self {
            ImageStyle::Sketch => {
                "Rough charcoal storyboard sketch, black and white, loose expressive lines, cinematic composition. "
            }
            ImageStyle::ColorStoryboard => {
                "Digital concept art, cinematic storyboard, dramatic lighting, vibrant colors, detailed environment. "
            }
            ImageStyle::Realistic => {
                "Cinematic film still, 4k, highly detailed, photorealistic, shot on 35mm lens, movie frame, atmospheric lighting. "
            }
        }
    }
}

/// Reference to a generated image.
///
/// Stored in `Shot::image_url` as its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ImageHandle {
    /// Inline `data:` URI carrying the image bytes
    #[display("{}", _0)]
    DataUri(String),
    /// Remote URL the image can be fetched from
    #[display("{}", _0)]
    Url(String),
}

impl ImageHandle {
    /// Build a data URI handle from base64 image data.
    pub fn from_base64(mime_type: &str, data: &str) -> Self {
        ImageHandle::DataUri(format!("data:{};base64,{}", mime_type, data))
    }

    /// Classify a stored handle string.
    pub fn parse(handle: impl Into<String>) -> Self {
        let handle = handle.into();
        if handle.starts_with("data:") {
            ImageHandle::DataUri(handle)
        } else {
            ImageHandle::Url(handle)
        }
    }

    /// The handle as stored in a shot.
    pub fn as_str(&self) -> &str {
        match self {
            ImageHandle::DataUri(s) | ImageHandle::Url(s) => s,
        }
    }

    /// Consume the handle into its string form.
    pub fn into_string(self) -> String {
        match self {
            ImageHandle::DataUri(s) | ImageHandle::Url(s) => s,
        }
    }
}
