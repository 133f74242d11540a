//! Provider (model transport) error types.

/// Failure conditions reported by a text or image generation provider.
///
/// Messages are carried verbatim from the provider; nothing here retries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// API key not found in the environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// The request could not be sent or the connection failed
    #[display("Provider request failed: {}", _0)]
    Request(String),
    /// Provider answered with a non-success status
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Body or message supplied by the provider
        message: String,
    },
    /// Provider answered but the envelope could not be decoded
    #[display("Could not decode provider response: {}", _0)]
    Decode(String),
    /// Provider answered with no text at all
    #[display("Model returned no text")]
    EmptyResponse,
}

impl ProviderErrorKind {
    /// Whether the condition is transient (rate limit, overload, timeout).
    ///
    /// Informational only: callers decide whether to offer a manual retry.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            ProviderErrorKind::Request(_) => true,
            _ => false,
        }
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use cinebreak_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::Http {
///     status_code: 429,
///     message: "Resource has been exhausted".to_string(),
/// });
/// assert!(err.kind.is_transient());
/// assert!(format!("{}", err).contains("Resource has been exhausted"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
