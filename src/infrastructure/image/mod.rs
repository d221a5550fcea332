//! Image caching and loading infrastructure.
//!
//! Two cache tiers (LRU memory, filesystem) composed into a store, plus a
//! loader that falls back to a single network fetch on a full miss.

pub mod disk_cache;
pub mod loader;
pub mod memory_cache;
pub mod store;

pub use disk_cache::{CACHE_SUBDIR, DiskImageCache, default_cache_root};
pub use loader::{ImageLoader, ImageReadyEvent};
pub use memory_cache::{CacheStats, DEFAULT_MEMORY_CAPACITY, MemoryImageCache};
pub use store::ImageStore;
