//! Application configuration.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::infrastructure::image::default_cache_root;

use super::args::CliArgs;

const APP_NAME: &str = "pagefeed";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "pagefeed";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Application configuration, loaded from TOML and overlaid with CLI
/// arguments.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Paginated feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Image cache settings.
    #[serde(default)]
    pub images: ImagesConfig,

    /// Reachability probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// Paginated feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// List resource endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Items requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Offset at which pagination stops.
    #[serde(default = "default_max_start")]
    pub max_start: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            max_start: default_max_start(),
        }
    }
}

/// Image cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Decoded images kept in the memory tier.
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,

    /// Disk cache root; platform cache directory when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            memory_capacity: default_memory_capacity(),
            cache_dir: None,
        }
    }
}

impl ImagesConfig {
    /// Effective disk cache root.
    #[must_use]
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_root)
    }
}

/// Reachability probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// URL probed for reachability; the feed endpoint when unset.
    #[serde(default)]
    pub url: Option<String>,

    /// Seconds between probes.
    #[serde(default = "default_probe_interval")]
    pub interval_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval_secs: default_probe_interval(),
        }
    }
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

const fn default_page_size() -> u32 {
    crate::domain::entities::DEFAULT_PAGE_SIZE
}

const fn default_max_start() -> u32 {
    crate::domain::entities::DEFAULT_MAX_START
}

const fn default_memory_capacity() -> usize {
    crate::infrastructure::image::DEFAULT_MEMORY_CAPACITY
}

const fn default_probe_interval() -> u64 {
    crate::infrastructure::connectivity::DEFAULT_PROBE_INTERVAL_SECS
}

impl AppConfig {
    /// Loads configuration from the given path, or the default location,
    /// falling back to defaults when no file exists.
    ///
    /// # Errors
    /// Returns error when an existing file cannot be read or parsed.
    pub fn load(path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let effective = path.cloned().or_else(Self::default_config_path);

        let Some(file) = effective else {
            return Ok(Self::default());
        };

        if !file.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&file)
            .map_err(|e| ConfigError::Io(file.display().to_string(), e.to_string()))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| ConfigError::Parse(file.display().to_string(), e.to_string()))?;
        Ok(config)
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(base_url) = args.base_url {
            self.feed.base_url = base_url;
        }
        if let Some(page_size) = args.page_size {
            self.feed.page_size = page_size;
        }
        if let Some(max_start) = args.max_start {
            self.feed.max_start = max_start;
        }
        if let Some(memory_capacity) = args.memory_capacity {
            self.images.memory_capacity = memory_capacity;
        }
        if let Some(cache_dir) = args.cache_dir {
            self.images.cache_dir = Some(cache_dir);
        }
        if let Some(probe_url) = args.probe_url {
            self.probe.url = Some(probe_url);
        }
        if let Some(probe_interval) = args.probe_interval {
            self.probe.interval_secs = probe_interval;
        }
    }

    /// URL the reachability probe targets.
    #[must_use]
    pub fn effective_probe_url(&self) -> &str {
        self.probe.url.as_deref().unwrap_or(&self.feed.base_url)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("pagefeed.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            feed: FeedConfig::default(),
            images: ImagesConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {0}: {1}")]
    Io(String, String),
    /// Config file could not be parsed.
    #[error("failed to parse config {0}: {1}")]
    Parse(String, String),
}
