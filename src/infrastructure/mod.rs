//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Network reachability monitoring.
pub mod connectivity;
/// HTTP page source adapter.
pub mod http;
/// Image handling (caching, loading).
pub mod image;

pub use config::{AppConfig, CliArgs, LogLevel};
pub use connectivity::ProbeMonitor;
pub use http::JsonApiClient;
pub use image::{DiskImageCache, ImageLoader, ImageReadyEvent, ImageStore, MemoryImageCache};
