//! Application configuration.

mod app_config;
mod args;

pub use app_config::{AppConfig, ConfigError, FeedConfig, ImagesConfig, LogLevel, ProbeConfig};
pub use args::CliArgs;
