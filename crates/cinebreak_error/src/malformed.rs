//! Errors for model output that cannot be trusted.

/// Pipeline stage whose output was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OutputStage {
    /// Structure analysis (scenes, characters, locations)
    #[display("structure analysis")]
    Structure,
    /// Per-scene shot generation
    #[display("shot generation")]
    Shots,
    /// Prompt update during consistency repair
    #[display("prompt update")]
    PromptUpdate,
}

/// Ways a model response can fail structural checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MalformedOutputKind {
    /// No JSON could be located in the response text
    #[display("no JSON found in response ({} chars)", _0)]
    NoJson(usize),
    /// Response text is not valid JSON
    #[display("invalid JSON: {}", _0)]
    InvalidJson(String),
    /// A required top-level key is absent
    #[display("missing required key '{}'", _0)]
    MissingKey(String),
    /// One or more schema violations, joined with `; `
    #[display("schema violations: {}", _0)]
    SchemaViolations(String),
}

/// Malformed model output with the stage that produced it.
///
/// # Examples
///
/// ```
/// use cinebreak_error::{MalformedOutputError, MalformedOutputKind, OutputStage};
///
/// let err = MalformedOutputError::new(
///     OutputStage::Structure,
///     MalformedOutputKind::MissingKey("scenes".to_string()),
/// );
/// assert!(format!("{}", err).contains("structure analysis"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Malformed Output Error: {} returned {} at line {} in {}", stage, kind, line, file)]
pub struct MalformedOutputError {
    /// Stage whose output was rejected
    pub stage: OutputStage,
    /// What was wrong with it
    pub kind: MalformedOutputKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MalformedOutputError {
    /// Create a new error with automatic location tracking.
    #[track_caller]
    pub fn new(stage: OutputStage, kind: MalformedOutputKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            stage,
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
