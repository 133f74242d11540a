//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, ImageError, InputError, JsonError, MalformedOutputError,
    ProviderError, StorageError,
};

/// Every error condition the workspace can surface.
///
/// # Examples
///
/// ```
/// use cinebreak_error::{CinebreakError, ProviderError, ProviderErrorKind};
///
/// let err: CinebreakError = ProviderError::new(ProviderErrorKind::EmptyResponse).into();
/// assert!(format!("{}", err).contains("no text"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CinebreakErrorKind {
    /// Missing or unusable input, caught before any stage runs
    #[from(InputError)]
    Input(InputError),
    /// Transport, auth or rate-limit failure reported by a provider
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Model output that is not valid JSON or breaks its schema
    #[from(MalformedOutputError)]
    MalformedOutput(MalformedOutputError),
    /// Image request that produced nothing usable
    #[from(ImageError)]
    Image(ImageError),
    /// Project file (de)serialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Snapshot or image archive error
    #[from(StorageError)]
    Storage(StorageError),
    /// Builder validation error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Cinebreak error with kind discrimination.
///
/// # Examples
///
/// ```
/// use cinebreak_error::{CinebreakErrorKind, CinebreakResult, ConfigError};
///
/// fn might_fail() -> CinebreakResult<()> {
///     Err(ConfigError::new("Missing transport section"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), CinebreakErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Cinebreak Error: {}", _0)]
pub struct CinebreakError(Box<CinebreakErrorKind>);

impl CinebreakError {
    /// Create a new error from a kind.
    pub fn new(kind: CinebreakErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CinebreakErrorKind {
        &self.0
    }

    /// Consume the error and return its kind.
    pub fn into_kind(self) -> CinebreakErrorKind {
        *self.0
    }
}

impl<T> From<T> for CinebreakError
where
    T: Into<CinebreakErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for cinebreak operations.
pub type CinebreakResult<T> = std::result::Result<T, CinebreakError>;
