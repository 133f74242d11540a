//! Input validation errors raised at the pipeline boundary.

/// Input conditions rejected before any stage is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum InputErrorKind {
    /// No screenplay text and no file
    #[display("No screenplay provided: paste text or supply a file")]
    EmptyScript,
    /// A file could not be read into a script payload
    #[display("Could not read script file: {}", _0)]
    UnreadableScript(String),
    /// An operation needs a document but none has been analyzed or loaded
    #[display("No breakdown document loaded")]
    NoDocument,
    /// Scene index outside the document
    #[display("Scene index {} out of range (document has {} scenes)", index, len)]
    SceneOutOfRange {
        /// Requested index
        index: usize,
        /// Number of scenes in the document
        len: usize,
    },
    /// Shot number not present in the scene
    #[display("Scene {} has no shot number {}", scene, shot)]
    ShotNotFound {
        /// Scene index
        scene: usize,
        /// Requested shot number
        shot: u32,
    },
    /// Character name not present in the registry
    #[display("Unknown character: {}", _0)]
    UnknownCharacter(String),
}

/// Input error with location tracking.
///
/// # Examples
///
/// ```
/// use cinebreak_error::{InputError, InputErrorKind};
///
/// let err = InputError::new(InputErrorKind::SceneOutOfRange { index: 4, len: 3 });
/// assert!(format!("{}", err).contains("out of range"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Input Error: {} at line {} in {}", kind, line, file)]
pub struct InputError {
    /// The kind of error that occurred
    pub kind: InputErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl InputError {
    /// Create a new input error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: InputErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
