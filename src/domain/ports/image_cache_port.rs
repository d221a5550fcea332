//! Port definitions for image caching and loading.

use std::sync::Arc;

/// Result type for cache-tier operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur inside a cache tier or the download pipeline.
///
/// These never reach the consumer as errors: every cache fault degrades to
/// a miss and the pipeline falls through to the next tier or the network.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// Failed to decode or encode image bytes.
    #[error("codec error: {0}")]
    Codec(String),
    /// I/O error during a disk cache operation.
    #[error("io error: {0}")]
    Io(String),
    /// Network error while downloading an image.
    #[error("network error: {0}")]
    Network(String),
}

/// Port for the two-tier image cache, keyed by full image URL.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Resolves a cached image for the URL, memory tier first, then disk.
    /// Returns None when neither tier has a usable entry.
    async fn get(&self, url: &str) -> Option<Arc<image::DynamicImage>>;

    /// Stores an image under the URL in both tiers. The memory write is
    /// unconditional; the disk write is best-effort.
    async fn put(&self, url: &str, image: Arc<image::DynamicImage>);

    /// Clears both tiers.
    async fn clear(&self);
}

/// Port for resolving an image with network fallback.
#[async_trait::async_trait]
pub trait ImageLoaderPort: Send + Sync {
    /// Resolves the image for a URL: cache first, then one network fetch.
    /// Returns None on any failure; no retry is performed.
    async fn load(&self, url: &str) -> Option<Arc<image::DynamicImage>>;
}
