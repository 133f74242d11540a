//! Image generation error types.

/// Image generation failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ImageErrorKind {
    /// Provider response carried no extractable image payload
    #[display("No image produced for prompt")]
    NoImageProduced,
    /// An image handle could not be decoded
    #[display("Invalid image data URI: {}", _0)]
    InvalidDataUri(String),
}

/// Image error with location tracking.
///
/// # Examples
///
/// ```
/// use cinebreak_error::{ImageError, ImageErrorKind};
///
/// let err = ImageError::new(ImageErrorKind::NoImageProduced);
/// assert!(format!("{}", err).contains("No image"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Image Error: {} at line {} in {}", kind, line, file)]
pub struct ImageError {
    /// The kind of error that occurred
    pub kind: ImageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ImageError {
    /// Create a new image error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ImageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
