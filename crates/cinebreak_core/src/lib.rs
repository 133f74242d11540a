//! Core data types for the cinebreak screenplay breakdown pipeline.
//!
//! This crate holds the breakdown document model shared by every other crate,
//! plus the payload types that cross the model transport boundary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod document;
mod image;
mod input;
mod request;
mod scene;
mod shot;

pub use character::{Character, CharacterRole};
pub use document::BreakdownDocument;
pub use image::{ImageHandle, ImageStyle};
pub use input::{PDF_MIME, ScriptInput, TEXT_MIME};
pub use request::{StructuredRequest, StructuredRequestBuilder};
pub use scene::{Scene, SceneNumber};
pub use shot::Shot;
