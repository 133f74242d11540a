//! Test utilities for pipeline tests.
//!
//! Scripted transports plus screenplay fixtures.

#![allow(dead_code)]

pub mod fixtures;
pub mod gated_transport;
pub mod memory_history;
pub mod mock_transport;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use gated_transport::GatedTransport;
#[allow(unused_imports)]
pub use memory_history::MemoryHistory;
#[allow(unused_imports)]
pub use mock_transport::{MockBehavior, MockImages, MockResponse, MockTransport, request_text};

use cinebreak_pipeline::{BreakdownPipeline, PipelineSettings};
use std::sync::Arc;

/// Pipeline over the given mocks with default settings.
pub fn pipeline(model: Arc<MockTransport>, images: Arc<MockImages>) -> BreakdownPipeline {
    BreakdownPipeline::new(model, images, PipelineSettings::default())
}
