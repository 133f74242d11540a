//! Character registry entries.

use serde::{Deserialize, Serialize};

/// Cast classification used by the breakdown.
///
/// Serialized with the labels production teams use on the call sheet; the
/// English names are accepted on input as well.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum CharacterRole {
    /// Lead characters
    #[serde(rename = "Protagonista", alias = "Protagonist")]
    #[strum(to_string = "Protagonista", serialize = "protagonist")]
    Protagonist,
    /// Secondary characters with lines or relevance
    #[serde(rename = "Elenco de Apoio", alias = "Supporting Cast", alias = "SupportingCast")]
    #[strum(to_string = "Elenco de Apoio", serialize = "supporting", serialize = "supporting-cast")]
    SupportingCast,
    /// Extras without names or relevant lines
    #[serde(rename = "Figuração", alias = "Background")]
    #[strum(to_string = "Figuração", serialize = "background", serialize = "extra")]
    Background,
}

/// One entry of the character registry.
///
/// `costume_description` is the single source of truth for a character's
/// look: both shot generation and consistency repair read it.
///
/// # Examples
///
/// ```
/// use cinebreak_core::{Character, CharacterRole};
///
/// let maria = Character::new("MARIA", CharacterRole::Protagonist, "red dress");
/// assert_eq!(maria.name, "MARIA");
/// assert!(maria.actor_name.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Identity key, matched case-sensitively
    pub name: String,
    /// Cast classification
    pub role: CharacterRole,
    /// Full physical appearance plus costume
    #[serde(rename = "costume_suggestion", alias = "costume_description")]
    pub costume_description: String,
    /// Visual identity colour as a hex code
    #[serde(rename = "color_palette_hex", default)]
    pub color_hex: String,
    /// Actor or actress cast for the part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    /// Contract negotiation status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_status: Option<String>,
    /// Free-form production notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Portrait rendered from `costume_description`; cleared when it changes
    #[serde(rename = "portraitUrl", default, skip_serializing_if = "Option::is_none")]
    pub portrait_url: Option<String>,
}

impl Character {
    /// Create a character with no colour, actor or notes.
    pub fn new(
        name: impl Into<String>,
        role: CharacterRole,
        costume_description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            costume_description: costume_description.into(),
            color_hex: String::new(),
            actor_name: None,
            contract_status: None,
            notes: None,
            portrait_url: None,
        }
    }
}
