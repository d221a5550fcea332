//! On-disk image cache tier.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};

use crate::domain::entities::ImageKey;
use crate::domain::ports::{CacheError, CacheResult};

/// Subdirectory of the platform cache directory holding image files.
pub const CACHE_SUBDIR: &str = "ImageCache";

/// Persistent tier of the image cache.
///
/// Entries live at `<root>/<key>` and survive the process; they are only
/// removed by [`DiskImageCache::clear`]. The root directory is created
/// lazily on the first write. All faults degrade to a miss: unreadable or
/// undecodable files behave exactly like absent ones.
pub struct DiskImageCache {
    root: PathBuf,
}

impl DiskImageCache {
    /// Creates a cache rooted at the given directory. Nothing is touched
    /// on disk until the first write.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Creates a cache at the platform default location
    /// (`<cache dir>/ImageCache`).
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(default_cache_root())
    }

    /// Absolute path backing a key.
    #[must_use]
    pub fn entry_path(&self, key: &ImageKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    /// Reads raw entry bytes, None on any I/O failure.
    pub async fn get_bytes(&self, key: &ImageKey) -> Option<Vec<u8>> {
        let path = self.entry_path(key);
        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(key = %key, path = %path.display(), "Disk cache hit");
                Some(bytes)
            }
            Err(_) => {
                trace!(key = %key, "Disk cache miss");
                None
            }
        }
    }

    /// Reads and decodes an entry. A file that fails to decode is treated
    /// as a miss, not an error; the corrupt entry stays untouched until a
    /// later write replaces it.
    pub async fn get(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>> {
        let bytes = self.get_bytes(key).await?;

        let result = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;

        match result {
            Ok(Ok(img)) => {
                debug!(key = %key, "Decoded image from disk cache");
                Some(Arc::new(img))
            }
            Ok(Err(e)) => {
                warn!(key = %key, error = %e, "Cached image failed to decode");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Decode task panicked");
                None
            }
        }
    }

    /// Writes entry bytes, creating the root and any intermediate
    /// directories as needed.
    ///
    /// # Errors
    /// Returns error if the directories or file cannot be written.
    pub async fn put_bytes(&self, key: &ImageKey, bytes: &[u8]) -> CacheResult<()> {
        let path = self.entry_path(key);

        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)
            .await
            .map_err(|e| CacheError::Io(format!("failed to create cache dir: {e}")))?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| CacheError::Io(format!("failed to create cache file: {e}")))?;

        file.write_all(bytes)
            .await
            .map_err(|e| CacheError::Io(format!("failed to write cache file: {e}")))?;

        file.flush()
            .await
            .map_err(|e| CacheError::Io(format!("failed to flush cache file: {e}")))?;

        debug!(key = %key, path = %path.display(), size = bytes.len(), "Stored image on disk");

        Ok(())
    }

    /// Returns true if an entry file exists for the key.
    pub async fn contains(&self, key: &ImageKey) -> bool {
        fs::try_exists(self.entry_path(key)).await.unwrap_or(false)
    }

    /// Removes the whole cache directory and its contents.
    ///
    /// # Errors
    /// Returns error if the directory exists but cannot be removed.
    pub async fn clear(&self) -> CacheResult<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                debug!(root = %self.root.display(), "Cleared disk cache");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(format!("failed to clear cache: {e}"))),
        }
    }
}

/// Platform default cache root (`<cache dir>/ImageCache`).
#[must_use]
pub fn default_cache_root() -> PathBuf {
    directories::ProjectDirs::from("com", "pagefeed", "pagefeed").map_or_else(
        || std::env::temp_dir().join("pagefeed").join(CACHE_SUBDIR),
        |dirs| dirs.cache_dir().join(CACHE_SUBDIR),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache_in_temp() -> (DiskImageCache, TempDir) {
        let temp = TempDir::new().unwrap();
        (DiskImageCache::new(temp.path().join("ImageCache")), temp)
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(2, 2);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_root_created_lazily() {
        let (cache, temp) = cache_in_temp();
        assert!(!temp.path().join("ImageCache").exists());

        let key = ImageKey::from_url("https://x/images/a.png").unwrap();
        cache.put_bytes(&key, &png_bytes()).await.unwrap();
        assert!(temp.path().join("ImageCache").exists());
    }

    #[tokio::test]
    async fn test_put_and_get_roundtrip() {
        let (cache, _temp) = cache_in_temp();
        let key = ImageKey::from_url("https://x/images/600/a.png").unwrap();

        cache.put_bytes(&key, &png_bytes()).await.unwrap();

        assert!(cache.contains(&key).await);
        let img = cache.get(&key).await.unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
    }

    #[tokio::test]
    async fn test_missing_entry_is_a_miss() {
        let (cache, _temp) = cache_in_temp();
        let key = ImageKey::from_url("https://x/images/none.png").unwrap();
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_bytes_degrade_to_miss() {
        let (cache, _temp) = cache_in_temp();
        let key = ImageKey::from_url("https://x/images/bad.png").unwrap();

        cache.put_bytes(&key, b"not an image").await.unwrap();
        assert!(cache.get(&key).await.is_none());

        // A later valid write replaces the corrupt entry.
        cache.put_bytes(&key, &png_bytes()).await.unwrap();
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_clear_removes_entries() {
        let (cache, _temp) = cache_in_temp();
        let key = ImageKey::from_url("https://x/images/a.png").unwrap();

        cache.put_bytes(&key, &png_bytes()).await.unwrap();
        cache.clear().await.unwrap();

        assert!(!cache.contains(&key).await);
        // Clearing an already-absent cache is fine.
        cache.clear().await.unwrap();
    }
}
