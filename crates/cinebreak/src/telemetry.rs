//! Tracing subscriber setup.

use crate::LoggingConfig;
use cinebreak_error::{CinebreakResult, ConfigError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter; `verbose` replaces the
/// configured filter with `debug`. Output goes to stderr so command output on
/// stdout stays machine-readable.
///
/// # Errors
///
/// `ConfigError` for an invalid filter or if a subscriber is already set.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> CinebreakResult<()> {
    let directives = if verbose { "debug" } else { config.filter.as_str() };
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directives).map_err(|e| {
            ConfigError::new(format!("Invalid log filter '{}': {}", directives, e))
        })?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    result.map_err(|e| ConfigError::new(format!("Failed to install subscriber: {}", e)))?;
    Ok(())
}
