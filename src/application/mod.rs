//! Application layer: the paginated feed service and its events.

mod events;
mod feed;

pub use events::FeedEvent;
pub use feed::{FeedCommand, FeedHandle, NEAR_END_OFFSET, PagedFeed, spawn_feed};
