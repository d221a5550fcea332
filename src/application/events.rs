//! Events delivered from the feed to its consumer.

use crate::domain::entities::Item;
use crate::domain::errors::FetchError;

/// Consumer-facing feed events.
///
/// Delivered on an unbounded channel so the worker never blocks on a slow
/// consumer. The accumulated list is handed off as a snapshot; the worker
/// keeps exclusive ownership of the live list.
#[derive(Debug)]
pub enum FeedEvent {
    /// The accumulated list grew; carries the full list after the append.
    ListChanged(Vec<Item>),
    /// A fetch was requested while the network is unreachable.
    NetworkUnavailable,
    /// A page fetch failed; the list and cursor are unchanged.
    FetchFailed(FetchError),
}
