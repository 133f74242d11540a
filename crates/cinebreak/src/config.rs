//! Layered configuration.
//!
//! Sources, later ones winning:
//!
//! 1. Bundled defaults (`cinebreak.toml` shipped with the crate)
//! 2. `~/.config/cinebreak/cinebreak.toml`
//! 3. `./cinebreak.toml`
//! 4. A file named on the command line
//! 5. `CINEBREAK_<SECTION>__<KEY>` environment variables

use cinebreak_core::ImageStyle;
use cinebreak_error::{
    CinebreakError, CinebreakResult, ConfigError, ProviderError, ProviderErrorKind,
};
use cinebreak_models::{PollinationsSettings, ThrottleSettings};
use cinebreak_pipeline::PipelineSettings;
use cinebreak_storage::DEFAULT_HISTORY_LIMIT;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Defaults compiled into the binary.
pub const BUNDLED_CONFIG: &str = include_str!("../cinebreak.toml");

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "CINEBREAK";

/// Text generation backend.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TextProvider {
    /// Gemini REST API with a local key
    #[default]
    Gemini,
    /// Backend proxy that holds the key
    Proxy,
    /// Groq chat completions
    Groq,
    /// OpenRouter chat completions
    OpenRouter,
}

/// Image generation backend.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageProvider {
    /// Gemini image model
    #[default]
    Gemini,
    /// Backend proxy
    Proxy,
    /// Keyless Pollinations URLs
    Pollinations,
}

/// `[transport]`: how text requests reach a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Backend
    pub provider: TextProvider,
    /// Model name sent to the backend
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Override of the Gemini base URL
    pub base_url: Option<String>,
    /// Proxy endpoint, required for the proxy backends
    pub proxy_endpoint: Option<String>,
    /// Environment variable holding the proxy key, if the proxy wants one
    pub proxy_api_key_env: Option<String>,
    /// HTTP timeout; none by default
    pub timeout_secs: Option<u64>,
    /// Request quota shared by text and image calls
    pub throttle: ThrottleSettings,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            provider: TextProvider::default(),
            model: cinebreak_models::DEFAULT_TEXT_MODEL.to_string(),
            api_key_env: cinebreak_models::GEMINI_API_KEY_ENV.to_string(),
            base_url: None,
            proxy_endpoint: None,
            proxy_api_key_env: None,
            timeout_secs: None,
            throttle: ThrottleSettings::default(),
        }
    }
}

impl TransportConfig {
    /// HTTP timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Read the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// `ProviderError` (`MissingApiKey`) if the variable is unset or blank.
    pub fn api_key(&self) -> CinebreakResult<String> {
        read_key(&self.api_key_env)
    }

    /// Read the proxy key, if one is configured.
    ///
    /// # Errors
    ///
    /// `ProviderError` (`MissingApiKey`) if a variable is named but unset.
    pub fn proxy_api_key(&self) -> CinebreakResult<Option<String>> {
        self.proxy_api_key_env.as_deref().map(read_key).transpose()
    }

    /// The proxy endpoint.
    ///
    /// # Errors
    ///
    /// `ConfigError` if none is configured.
    pub fn proxy_endpoint(&self) -> CinebreakResult<&str> {
        self.proxy_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ConfigError::new("transport.proxy_endpoint is required for the proxy backend").into())
    }
}

fn read_key(var: &str) -> CinebreakResult<String> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ProviderError::new(ProviderErrorKind::MissingApiKey(var.to_string())).into())
}

/// `[image]`: storyboard rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Backend
    pub provider: ImageProvider,
    /// Image model for the Gemini backend
    pub model: String,
    /// Style used when none is given
    pub style: ImageStyle,
    /// Options for the Pollinations backend
    pub pollinations: PollinationsSettings,
    /// Where inline frames are archived; not archived when unset
    pub archive_dir: Option<PathBuf>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider: ImageProvider::default(),
            model: cinebreak_models::DEFAULT_IMAGE_MODEL.to_string(),
            style: ImageStyle::default(),
            pollinations: PollinationsSettings::default(),
            archive_dir: None,
        }
    }
}

/// `[history]`: saved snapshots of analyzed projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Save a snapshot after every analysis
    pub enabled: bool,
    /// Directory of the history file; the platform data dir when unset
    pub dir: Option<PathBuf>,
    /// Snapshots kept
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl HistoryConfig {
    /// History directory, if one can be determined.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("cinebreak")))
    }
}

/// `[logging]`: tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,cinebreak=debug".to_string(),
            json: false,
        }
    }
}

/// Complete configuration.
///
/// # Example
///
/// ```no_run
/// use cinebreak::CinebreakConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CinebreakConfig::load(None)?;
/// println!("model: {}", config.transport.model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CinebreakConfig {
    /// Text transport
    pub transport: TransportConfig,
    /// Stage settings
    pub pipeline: PipelineSettings,
    /// Image transport and archive
    pub image: ImageConfig,
    /// Project history
    pub history: HistoryConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl CinebreakConfig {
    /// Load every layer.
    ///
    /// `explicit` must exist when given; the user files are optional.
    ///
    /// # Errors
    ///
    /// `ConfigError` if a file cannot be parsed or a value has the wrong type.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> CinebreakResult<Self> {
        debug!("Loading configuration");
        let mut builder = Self::bundled();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/cinebreak/cinebreak.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder = builder.add_source(File::with_name("cinebreak").required(false));
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        Self::finish(builder.add_source(Self::environment(None)))
    }

    /// Bundled defaults, then `files` in order, then `env` as if it were the
    /// process environment. User files and the real environment are ignored.
    ///
    /// # Errors
    ///
    /// `ConfigError` if a file is missing or malformed.
    pub fn from_sources(files: &[&Path], env: HashMap<String, String>) -> CinebreakResult<Self> {
        let mut builder = Self::bundled();
        for path in files {
            builder = builder.add_source(File::from(*path));
        }
        Self::finish(builder.add_source(Self::environment(Some(env))))
    }

    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the bundled file is malformed.
    pub fn bundled_defaults() -> CinebreakResult<Self> {
        Self::finish(Self::bundled())
    }

    fn bundled() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(BUNDLED_CONFIG, FileFormat::Toml))
    }

    fn environment(source: Option<HashMap<String, String>>) -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(source)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> CinebreakResult<Self> {
        builder
            .build()
            .map_err(|e| {
                CinebreakError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                CinebreakError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
