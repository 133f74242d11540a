//! Matching registry characters to the names listed in a scene.

use cinebreak_core::{Character, Scene};
use serde::{Deserialize, Serialize};

/// How registry names are matched against scene character entries.
///
/// An exact, case-sensitive match always counts. The strategies differ in the
/// fallback used for entries like "PADRE JOÃO" or "MARIA (V.O.)".
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MatchStrategy {
    /// Exact name equality only
    Exact,
    /// Fall back to raw substring containment; "ANA" matches "JUANA"
    ExactThenSubstring,
    /// Fall back to whole-word containment; "ANA" does not match "JUANA"
    #[default]
    ExactThenWord,
}

/// Filters the character registry down to the characters of one scene.
///
/// # Examples
///
/// ```
/// use cinebreak_pipeline::{CharacterMatcher, MatchStrategy};
///
/// let entries = vec!["PADRE JOÃO".to_string(), "JUANA".to_string()];
/// let matcher = CharacterMatcher::new(MatchStrategy::ExactThenWord);
/// assert!(matcher.is_present("JOÃO", &entries));
/// assert!(!matcher.is_present("ANA", &entries));
///
/// let legacy = CharacterMatcher::new(MatchStrategy::ExactThenSubstring);
/// assert!(legacy.is_present("ANA", &entries));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterMatcher {
    strategy: MatchStrategy,
}

impl CharacterMatcher {
    /// Create a matcher with the given strategy.
    pub fn new(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    /// Active strategy.
    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Whether `name` refers to someone listed in `entries`.
    pub fn is_present(&self, name: &str, entries: &[String]) -> bool {
        if name.is_empty() {
            return false;
        }
        if entries.iter().any(|entry| entry == name) {
            return true;
        }
        match self.strategy {
            MatchStrategy::Exact => false,
            MatchStrategy::ExactThenSubstring => entries.iter().any(|entry| entry.contains(name)),
            MatchStrategy::ExactThenWord => {
                let needle = words(name);
                !needle.is_empty()
                    && entries
                        .iter()
                        .any(|entry| contains_run(&words(entry), &needle))
            }
        }
    }

    /// Registry entries present in `scene`, in registry order.
    pub fn characters_in<'a>(&self, registry: &'a [Character], scene: &Scene) -> Vec<&'a Character> {
        registry
            .iter()
            .filter(|c| self.is_present(&c.name, &scene.characters))
            .collect()
    }
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn contains_run(haystack: &[&str], needle: &[&str]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
