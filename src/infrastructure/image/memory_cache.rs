//! In-memory LRU image cache tier.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

/// Default maximum number of decoded images held in memory.
pub const DEFAULT_MEMORY_CAPACITY: usize = 50;

/// Fast tier of the image cache: decoded images keyed by full URL, with
/// LRU eviction at a fixed capacity.
pub struct MemoryImageCache {
    cache: RwLock<LruCache<String, Arc<image::DynamicImage>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Gets a decoded image, promoting it in the LRU order.
    pub async fn get(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        let mut cache = self.cache.write().await;
        if let Some(img) = cache.get(url) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(url, "Memory cache hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(url, "Memory cache miss");
            None
        }
    }

    /// Stores a decoded image, evicting the least recently used entry when
    /// at capacity.
    pub async fn put(&self, url: String, image: Arc<image::DynamicImage>) {
        let mut cache = self.cache.write().await;
        debug!(url, "Storing image in memory cache");
        cache.put(url, image);
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        debug!("Cleared memory image cache");
    }

    /// Best-effort entry count.
    pub fn len(&self) -> usize {
        self.cache.try_read().map_or(0, |c| c.len())
    }

    /// Returns true if no entries are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns hit/miss statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.len(),
        }
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

/// Statistics about memory-tier performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} images, {} hits, {} misses",
            self.size, self.hits, self.misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> Arc<image::DynamicImage> {
        Arc::new(image::DynamicImage::new_rgb8(4, 4))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = MemoryImageCache::new(10);
        cache.put("https://x/images/a.png".into(), test_image()).await;

        let hit = cache.get("https://x/images/a.png").await;
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().width(), 4);
    }

    #[tokio::test]
    async fn test_get_is_idempotent() {
        let cache = MemoryImageCache::new(10);

        assert!(cache.get("https://x/missing.png").await.is_none());
        assert!(cache.get("https://x/missing.png").await.is_none());

        cache.put("https://x/a.png".into(), test_image()).await;
        assert!(cache.get("https://x/a.png").await.is_some());
        assert!(cache.get("https://x/a.png").await.is_some());
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryImageCache::new(2);

        cache.put("a".into(), test_image()).await;
        cache.put("b".into(), test_image()).await;
        cache.put("c".into(), test_image()).await;

        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn test_stats() {
        let cache = MemoryImageCache::new(10);
        cache.put("a".into(), test_image()).await;

        let _ = cache.get("a").await;
        let _ = cache.get("missing").await;

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }
}
