//! Request throttling for any transport.
//!
//! Combines a governor quota (requests per minute) with a Tokio semaphore
//! bounding requests in flight. Callers wait for capacity; nothing is retried.

use async_trait::async_trait;
use cinebreak_core::{ImageHandle, StructuredRequest};
use cinebreak_error::{CinebreakResult, ProviderError, ProviderErrorKind};
use cinebreak_interface::{ImageTransport, ModelTransport};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Throttle limits. `None` disables a limit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[serde(default)]
#[builder(setter(into, strip_option), default)]
pub struct ThrottleSettings {
    /// Requests started per minute
    requests_per_minute: Option<u32>,
    /// Requests in flight at once
    max_concurrent: Option<u32>,
}

impl ThrottleSettings {
    /// Start building settings.
    pub fn builder() -> ThrottleSettingsBuilder {
        ThrottleSettingsBuilder::default()
    }

    /// Whether any limit is set.
    pub fn is_limited(&self) -> bool {
        self.requests_per_minute.is_some() || self.max_concurrent.is_some()
    }
}

/// A transport behind a request quota.
///
/// # Example
///
/// ```
/// use cinebreak_models::{PollinationsImageTransport, ThrottleSettings, Throttled};
///
/// let settings = ThrottleSettings::builder()
///     .requests_per_minute(15_u32)
///     .max_concurrent(2_u32)
///     .build()
///     .unwrap();
/// let images = Throttled::new(PollinationsImageTransport::default(), settings);
/// assert_eq!(images.available_slots(), 2);
/// ```
#[derive(Clone)]
pub struct Throttled<T> {
    inner: T,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl<T> Throttled<T> {
    /// Wrap a transport.
    pub fn new(inner: T, settings: ThrottleSettings) -> Self {
        let rpm_limiter = settings
            .requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|n| Arc::new(RateLimiter::direct(Quota::per_minute(n))));

        let max_concurrent = settings
            .max_concurrent
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .unwrap_or(Semaphore::MAX_PERMITS);

        Self {
            inner,
            rpm_limiter,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Free in-flight slots right now.
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits().min(self.max_concurrent)
    }

    async fn acquire(&self) -> CinebreakResult<OwnedSemaphorePermit> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }
        let permit = self.semaphore.clone().acquire_owned().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Request(format!("Throttle closed: {}", e)))
        })?;
        trace!(available = self.semaphore.available_permits(), "Acquired request slot");
        Ok(permit)
    }
}

impl<T> std::fmt::Debug for Throttled<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttled")
            .field("inner", &self.inner)
            .field("rpm_limited", &self.rpm_limiter.is_some())
            .field("max_concurrent", &self.max_concurrent)
            .finish()
    }
}

#[async_trait]
impl<T: ModelTransport> ModelTransport for Throttled<T> {
    async fn generate(&self, request: &StructuredRequest) -> CinebreakResult<String> {
        let _permit = self.acquire().await?;
        self.inner.generate(request).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

#[async_trait]
impl<T: ImageTransport> ImageTransport for Throttled<T> {
    async fn generate_image(&self, prompt: &str) -> CinebreakResult<ImageHandle> {
        let _permit = self.acquire().await?;
        self.inner.generate_image(prompt).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
