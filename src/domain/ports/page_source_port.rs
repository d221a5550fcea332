//! Port definition for the paginated list resource.

use async_trait::async_trait;

use crate::domain::entities::{FetchCursor, Item};
use crate::domain::errors::FetchError;

/// Port for fetching one page of the list resource.
///
/// Implementations issue a single request for the cursor's current window
/// and decode the full body; a partial decode is a failure, never a
/// partial page.
#[async_trait]
pub trait PageSourcePort: Send + Sync {
    /// Fetches the page at the cursor's current window.
    async fn fetch_page(&self, cursor: &FetchCursor) -> Result<Vec<Item>, FetchError>;
}
