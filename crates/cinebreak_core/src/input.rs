//! Screenplay payloads sent to the text model.

use cinebreak_error::{CinebreakResult, InputError, InputErrorKind};
use std::path::Path;

/// MIME type of PDF screenplays.
pub const PDF_MIME: &str = "application/pdf";
/// MIME type of plain text screenplays.
pub const TEXT_MIME: &str = "text/plain";

/// A screenplay as handed to the model: plain text, or a binary document
/// the provider reads as an inline attachment.
///
/// # Examples
///
/// ```
/// use cinebreak_core::{ScriptInput, PDF_MIME};
///
/// let text = ScriptInput::text("INT. IGREJA - NOITE");
/// assert_eq!(text.mime_type(), "text/plain");
///
/// let pdf = ScriptInput::binary(vec![0x25, 0x50, 0x44, 0x46], PDF_MIME);
/// assert!(!pdf.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptInput {
    /// Plain text screenplay
    Text(String),
    /// Binary document with its MIME type
    Binary {
        /// Raw document bytes
        data: Vec<u8>,
        /// MIME type, e.g. `application/pdf`
        mime_type: String,
    },
}

impl ScriptInput {
    /// Plain text payload.
    pub fn text(text: impl Into<String>) -> Self {
        ScriptInput::Text(text.into())
    }

    /// Binary payload with an explicit MIME type.
    pub fn binary(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        ScriptInput::Binary {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Read a screenplay from disk.
    ///
    /// Files ending in `.pdf` (or starting with the `%PDF` magic) become binary
    /// PDF payloads; everything else is read as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an `InputError` if the file cannot be read or is empty.
    pub fn from_path(path: impl AsRef<Path>) -> CinebreakResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            InputError::new(InputErrorKind::UnreadableScript(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            || bytes.starts_with(b"%PDF");

        let input = if is_pdf {
            ScriptInput::binary(bytes, PDF_MIME)
        } else {
            let text = String::from_utf8(bytes).map_err(|e| {
                InputError::new(InputErrorKind::UnreadableScript(format!(
                    "{} is not UTF-8 text: {}",
                    path.display(),
                    e
                )))
            })?;
            ScriptInput::Text(text)
        };

        input.ensure_not_empty()?;
        tracing::debug!(path = %path.display(), mime = input.mime_type(), "Loaded script");
        Ok(input)
    }

    /// MIME type of the payload.
    pub fn mime_type(&self) -> &str {
        match self {
            ScriptInput::Text(_) => TEXT_MIME,
            ScriptInput::Binary { mime_type, .. } => mime_type,
        }
    }

    /// Whether the payload carries nothing usable (blank text or no bytes).
    pub fn is_empty(&self) -> bool {
        match self {
            ScriptInput::Text(text) => text.trim().is_empty(),
            ScriptInput::Binary { data, .. } => data.is_empty(),
        }
    }

    /// Reject empty payloads at the boundary.
    ///
    /// # Errors
    ///
    /// Returns `InputErrorKind::EmptyScript` when [`ScriptInput::is_empty`] holds.
    pub fn ensure_not_empty(&self) -> CinebreakResult<()> {
        if self.is_empty() {
            return Err(InputError::new(InputErrorKind::EmptyScript).into());
        }
        Ok(())
    }
}
