//! Error types for the cinebreak workspace.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind and records where it was raised
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! All of them convert into [`CinebreakError`], the boxed top-level error used by
//! [`CinebreakResult`].
//!
//! # Examples
//!
//! ```
//! use cinebreak_error::{CinebreakResult, InputError, InputErrorKind};
//!
//! fn require_script(text: &str) -> CinebreakResult<&str> {
//!     if text.trim().is_empty() {
//!         Err(InputError::new(InputErrorKind::EmptyScript))?
//!     }
//!     Ok(text)
//! }
//!
//! assert!(require_script("   ").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod image;
mod input;
mod json;
mod malformed;
mod provider;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{CinebreakError, CinebreakErrorKind, CinebreakResult};
pub use image::{ImageError, ImageErrorKind};
pub use input::{InputError, InputErrorKind};
pub use json::JsonError;
pub use malformed::{MalformedOutputError, MalformedOutputKind, OutputStage};
pub use provider::{ProviderError, ProviderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
