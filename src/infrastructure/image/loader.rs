//! Image resolution with network fallback.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::domain::ports::{CacheError, CacheResult, ImageCachePort, ImageLoaderPort};

use super::store::ImageStore;

const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Delivered when an asynchronous image load finishes.
///
/// `image` is None for any failure: transport error, bad status, or
/// undecodable bytes. Failed loads never enter the cache, so a later
/// request simply tries again.
#[derive(Debug, Clone)]
pub struct ImageReadyEvent {
    /// The requested image URL.
    pub url: String,
    /// The resolved image, or None if the load failed.
    pub image: Option<Arc<image::DynamicImage>>,
}

/// Resolves images through the two-tier store, falling back to a single
/// network fetch per request. No retry, no backoff.
pub struct ImageLoader {
    store: Arc<ImageStore>,
    client: Client,
    pending: Mutex<HashSet<String>>,
    event_tx: mpsc::UnboundedSender<ImageReadyEvent>,
}

impl ImageLoader {
    /// Creates a loader over the given store.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        store: Arc<ImageStore>,
        event_tx: mpsc::UnboundedSender<ImageReadyEvent>,
    ) -> CacheResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| CacheError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            store,
            client,
            pending: Mutex::new(HashSet::new()),
            event_tx,
        })
    }

    /// Starts resolving an image in the background; the result arrives as
    /// an [`ImageReadyEvent`]. Concurrent requests for the same URL are
    /// collapsed into one load.
    pub fn load_async(self: &Arc<Self>, url: String) {
        {
            let mut pending = self.pending.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if !pending.insert(url.clone()) {
                trace!(url, "Load already in flight");
                return;
            }
        }

        let loader = Arc::clone(self);
        tokio::spawn(async move {
            let image = loader.load(&url).await;
            loader
                .pending
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .remove(&url);
            let _ = loader.event_tx.send(ImageReadyEvent { url, image });
        });
    }

    /// Number of loads currently in flight.
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    async fn download(&self, url: &str) -> CacheResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Network(format!("HTTP {status}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| CacheError::Network(format!("failed to read body: {e}")))
    }
}

#[async_trait]
impl ImageLoaderPort for ImageLoader {
    async fn load(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        if let Some(img) = self.store.get(url).await {
            return Some(img);
        }

        debug!(url, "Downloading image");
        let bytes = match self.download(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(url, error = %e, "Image download failed");
                return None;
            }
        };

        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;
        let img = match decoded {
            Ok(Ok(img)) => Arc::new(img),
            Ok(Err(e)) => {
                warn!(url, error = %e, "Downloaded bytes failed to decode");
                return None;
            }
            Err(e) => {
                warn!(url, error = %e, "Decode task panicked");
                return None;
            }
        };

        self.store.put(url, img.clone()).await;
        debug!(url, "Image loaded from network");

        Some(img)
    }
}
