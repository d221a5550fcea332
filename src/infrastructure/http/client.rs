//! HTTP adapter for the paginated list resource.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::domain::entities::{FetchCursor, Item};
use crate::domain::errors::FetchError;
use crate::domain::ports::PageSourcePort;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Page source backed by a JSON REST endpoint.
///
/// Issues `GET <base>?start=<s>&end=<e>` per page and requires status 200
/// plus a fully decodable item array. Timeout policy is the client
/// default; the feed adds none of its own.
#[derive(Debug)]
pub struct JsonApiClient {
    client: Client,
    base_url: Url,
}

impl JsonApiClient {
    /// Creates a client for the given endpoint.
    ///
    /// # Errors
    /// Returns `FetchError::InvalidUrl` when the endpoint does not parse,
    /// `FetchError::Network` when the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|_| FetchError::invalid_url(base_url))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PageSourcePort for JsonApiClient {
    async fn fetch_page(&self, cursor: &FetchCursor) -> Result<Vec<Item>, FetchError> {
        let (start, end) = cursor.window();

        debug!(url = %self.base_url, start, end, "Requesting page");

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[("start", start), ("end", end)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Page request rejected");
            return Err(FetchError::invalid_response(status.as_u16()));
        }

        let body = response.bytes().await?;
        let items: Vec<Item> = serde_json::from_slice(&body)?;

        debug!(start, count = items.len(), "Page decoded");

        Ok(items)
    }
}
