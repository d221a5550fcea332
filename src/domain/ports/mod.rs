//! Port definitions.

mod connectivity_port;
mod image_cache_port;
mod page_source_port;

pub use connectivity_port::ConnectivityPort;
pub use image_cache_port::{CacheError, CacheResult, ImageCachePort, ImageLoaderPort};
pub use page_source_port::PageSourcePort;

#[cfg(test)]
pub mod mocks {
    pub use super::connectivity_port::mock::MockConnectivity;
    pub use super::page_source_port::mock::MockPageSource;
}
