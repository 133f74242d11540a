//! Turning configuration into transports and a coordinator.

use crate::{CinebreakConfig, HistoryConfig, ImageConfig, ImageProvider, TextProvider, TransportConfig};
use cinebreak_error::CinebreakResult;
use cinebreak_interface::{ImageTransport, ModelTransport, SnapshotStore};
use cinebreak_models::{
    GeminiImageTransport, GeminiTransport, OpenAiCompatTransport, PollinationsImageTransport,
    ProxiedImageTransport, ProxiedTransport, Throttled, build_http_client,
};
use cinebreak_pipeline::{BreakdownPipeline, PipelineCoordinator};
use cinebreak_storage::{FileSystemSnapshotStore, ImageArchive};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Text transport for `[transport]`, throttled.
///
/// # Errors
///
/// `ProviderError` (`MissingApiKey`) when the key variable is unset,
/// `ConfigError` for a proxy without an endpoint.
pub fn model_transport(config: &TransportConfig) -> CinebreakResult<Arc<dyn ModelTransport>> {
    let client = build_http_client(config.timeout())?;
    let throttle = config.throttle;

    let transport: Arc<dyn ModelTransport> = match config.provider {
        TextProvider::Gemini => {
            let mut transport =
                GeminiTransport::new(config.api_key()?, &config.model).with_client(client);
            if let Some(base_url) = &config.base_url {
                transport = transport.with_base_url(base_url);
            }
            Arc::new(Throttled::new(transport, throttle))
        }
        TextProvider::Proxy => {
            let mut transport = ProxiedTransport::new(config.proxy_endpoint()?)
                .with_model(&config.model)
                .with_client(client);
            if let Some(key) = config.proxy_api_key()? {
                transport = transport.with_api_key(key);
            }
            Arc::new(Throttled::new(transport, throttle))
        }
        TextProvider::Groq => Arc::new(Throttled::new(
            OpenAiCompatTransport::groq(config.api_key()?, &config.model).with_client(client),
            throttle,
        )),
        TextProvider::OpenRouter => Arc::new(Throttled::new(
            OpenAiCompatTransport::openrouter(config.api_key()?, &config.model)
                .with_client(client),
            throttle,
        )),
    };

    info!(
        provider = transport.provider_name(),
        model = transport.model_name(),
        "Text transport ready"
    );
    Ok(transport)
}

/// Image transport for `[image]`, sharing the `[transport]` credentials and
/// quota.
///
/// # Errors
///
/// As [`model_transport`]; Pollinations needs no key.
pub fn image_transport(
    image: &ImageConfig,
    transport: &TransportConfig,
) -> CinebreakResult<Arc<dyn ImageTransport>> {
    let throttle = transport.throttle;

    let images: Arc<dyn ImageTransport> = match image.provider {
        ImageProvider::Gemini => {
            let mut images = GeminiImageTransport::new(transport.api_key()?, &image.model)
                .with_client(build_http_client(transport.timeout())?);
            if let Some(base_url) = &transport.base_url {
                images = images.with_base_url(base_url);
            }
            Arc::new(Throttled::new(images, throttle))
        }
        ImageProvider::Proxy => {
            let mut images = ProxiedImageTransport::new(transport.proxy_endpoint()?)
                .with_client(build_http_client(transport.timeout())?);
            if let Some(key) = transport.proxy_api_key()? {
                images = images.with_api_key(key);
            }
            Arc::new(Throttled::new(images, throttle))
        }
        ImageProvider::Pollinations => {
            Arc::new(PollinationsImageTransport::new(image.pollinations.clone()))
        }
    };

    info!(provider = images.provider_name(), "Image transport ready");
    Ok(images)
}

/// Project history for `[history]`, or `None` when disabled or no directory
/// can be determined.
///
/// # Errors
///
/// `StorageError` if the directory cannot be created.
pub fn snapshot_store(config: &HistoryConfig) -> CinebreakResult<Option<Arc<FileSystemSnapshotStore>>> {
    if !config.enabled {
        debug!("Project history disabled");
        return Ok(None);
    }
    let Some(dir) = config.resolved_dir() else {
        warn!("No data directory available; project history disabled");
        return Ok(None);
    };
    let store = FileSystemSnapshotStore::in_dir(dir)?.with_limit(config.limit);
    debug!(path = %store.path().display(), limit = store.limit(), "Project history ready");
    Ok(Some(Arc::new(store)))
}

/// Image archive for `[image]`, if `archive_dir` is set.
///
/// # Errors
///
/// `StorageError` if the directory cannot be created.
pub fn image_archive(config: &ImageConfig) -> CinebreakResult<Option<ImageArchive>> {
    config.archive_dir.as_ref().map(ImageArchive::new).transpose()
}

/// A coordinator wired from the whole configuration.
///
/// # Errors
///
/// Any error of the builders above.
pub fn coordinator(config: &CinebreakConfig) -> CinebreakResult<PipelineCoordinator> {
    let pipeline = BreakdownPipeline::new(
        model_transport(&config.transport)?,
        image_transport(&config.image, &config.transport)?,
        config.pipeline.clone(),
    );

    let coordinator = PipelineCoordinator::new(pipeline);
    Ok(match snapshot_store(&config.history)? {
        Some(history) => coordinator.with_history(history as Arc<dyn SnapshotStore>),
        None => coordinator,
    })
}
