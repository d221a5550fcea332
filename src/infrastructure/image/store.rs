//! Two-tier image store.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::entities::ImageKey;
use crate::domain::ports::{CacheError, CacheResult, ImageCachePort};

use super::disk_cache::DiskImageCache;
use super::memory_cache::{CacheStats, MemoryImageCache};

/// Memory-over-disk image cache.
///
/// Lookup order is memory, then disk (repopulating memory on a disk hit).
/// Writes hit memory unconditionally and disk best-effort: a failed disk
/// write costs persistence, never correctness.
pub struct ImageStore {
    memory: MemoryImageCache,
    disk: DiskImageCache,
}

impl ImageStore {
    /// Creates a store with the given memory capacity and disk root.
    #[must_use]
    pub fn new(memory_capacity: usize, disk_root: PathBuf) -> Self {
        Self {
            memory: MemoryImageCache::new(memory_capacity),
            disk: DiskImageCache::new(disk_root),
        }
    }

    /// Creates a store with default capacity at the platform cache
    /// location.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            memory: MemoryImageCache::default(),
            disk: DiskImageCache::default_location(),
        }
    }

    /// Memory-tier statistics.
    #[must_use]
    pub fn memory_stats(&self) -> CacheStats {
        self.memory.stats()
    }
}

#[async_trait]
impl ImageCachePort for ImageStore {
    async fn get(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        if let Some(img) = self.memory.get(url).await {
            return Some(img);
        }

        let key = ImageKey::from_url(url)?;
        let img = self.disk.get(&key).await?;

        self.memory.put(url.to_owned(), img.clone()).await;
        debug!(url, "Promoted disk entry to memory cache");
        Some(img)
    }

    async fn put(&self, url: &str, image: Arc<image::DynamicImage>) {
        self.memory.put(url.to_owned(), image.clone()).await;

        let Some(key) = ImageKey::from_url(url) else {
            warn!(url, "No disk key derivable, kept in memory only");
            return;
        };

        match encode_png(image).await {
            Ok(bytes) => {
                if let Err(e) = self.disk.put_bytes(&key, &bytes).await {
                    warn!(key = %key, error = %e, "Disk cache write failed");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "Image encode failed"),
        }
    }

    async fn clear(&self) {
        self.memory.clear().await;
        if let Err(e) = self.disk.clear().await {
            warn!(error = %e, "Failed to clear disk cache");
        }
    }
}

/// Serializes a decoded image to PNG off the async threads.
async fn encode_png(image: Arc<image::DynamicImage>) -> CacheResult<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| CacheError::Codec(format!("failed to encode image: {e}")))?;
        Ok(buf.into_inner())
    })
    .await
    .map_err(|e| CacheError::Codec(format!("encode task panicked: {e}")))?
}
