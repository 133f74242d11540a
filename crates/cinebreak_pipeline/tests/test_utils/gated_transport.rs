//! A transport that holds calls until the test lets them through.

use super::MockTransport;
use async_trait::async_trait;
use cinebreak_core::StructuredRequest;
use cinebreak_error::CinebreakResult;
use cinebreak_interface::ModelTransport;
use tokio::sync::{Barrier, Semaphore};

/// How calls are held.
pub enum Gate {
    /// Each call waits until this many calls are in flight together
    Barrier(Barrier),
    /// Each call adds a permit to `entered`, then waits for one on `release`
    Hold {
        entered: Semaphore,
        release: Semaphore,
    },
}

/// Wraps a [`MockTransport`]; answers come from it once the gate opens.
pub struct GatedTransport {
    inner: MockTransport,
    gate: Gate,
}

impl GatedTransport {
    /// Calls proceed only once `parties` of them are waiting at once.
    pub fn barrier(inner: MockTransport, parties: usize) -> Self {
        Self {
            inner,
            gate: Gate::Barrier(Barrier::new(parties)),
        }
    }

    /// Calls wait until [`GatedTransport::release`].
    pub fn held(inner: MockTransport) -> Self {
        Self {
            inner,
            gate: Gate::Hold {
                entered: Semaphore::new(0),
                release: Semaphore::new(0),
            },
        }
    }

    /// Wait until `calls` calls are being held.
    pub async fn wait_for_calls(&self, calls: u32) {
        if let Gate::Hold { entered, .. } = &self.gate {
            entered.acquire_many(calls).await.unwrap().forget();
        }
    }

    /// Let `calls` held calls through.
    pub fn release(&self, calls: usize) {
        if let Gate::Hold { release, .. } = &self.gate {
            release.add_permits(calls);
        }
    }

    pub fn inner(&self) -> &MockTransport {
        &self.inner
    }
}

#[async_trait]
impl ModelTransport for GatedTransport {
    async fn generate(&self, request: &StructuredRequest) -> CinebreakResult<String> {
        match &self.gate {
            Gate::Barrier(barrier) => {
                barrier.wait().await;
            }
            Gate::Hold { entered, release } => {
                entered.add_permits(1);
                release.acquire().await.unwrap().forget();
            }
        }
        self.inner.generate(request).await
    }

    fn provider_name(&self) -> &'static str {
        "gated"
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
