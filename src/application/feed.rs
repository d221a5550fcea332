//! Paginated feed service.
//!
//! Accumulates the list resource page by page, driven by scroll-position
//! reports from the consumer and released by the reachability signal.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::domain::entities::{FetchCursor, Item};
use crate::domain::ports::{ConnectivityPort, PageSourcePort};

use super::events::FeedEvent;

/// A visible row is this many positions from the end when the next page
/// fetch is triggered.
pub const NEAR_END_OFFSET: usize = 2;

/// Commands accepted by the feed worker.
#[derive(Debug, Clone, Copy)]
pub enum FeedCommand {
    /// Begin the initial load (or defer it until reachable).
    Start,
    /// The consumer displayed the row at `index` of `total` rows.
    RowVisible {
        /// Zero-based index of the visible row.
        index: usize,
        /// Total row count the consumer currently shows.
        total: usize,
    },
}

/// Cloneable handle for driving a spawned feed worker.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    tx: mpsc::UnboundedSender<FeedCommand>,
}

impl FeedHandle {
    /// Requests the initial load.
    pub fn start(&self) {
        let _ = self.tx.send(FeedCommand::Start);
    }

    /// Reports a visible row to the near-end trigger.
    pub fn row_visible(&self, index: usize, total: usize) {
        let _ = self.tx.send(FeedCommand::RowVisible { index, total });
    }
}

/// Accumulating pagination state machine.
///
/// Owns the list exclusively; consumers only ever see snapshots carried by
/// [`FeedEvent::ListChanged`]. All mutation happens through `&mut self`
/// methods awaited one at a time by the worker loop, so page appends are
/// serialized in fetch order by construction.
pub struct PagedFeed {
    source: Arc<dyn PageSourcePort>,
    cursor: FetchCursor,
    items: Vec<Item>,
    reachable: bool,
    started: bool,
    initial_pending: bool,
    event_tx: mpsc::UnboundedSender<FeedEvent>,
}

impl PagedFeed {
    /// Creates a feed over the given page source.
    #[must_use]
    pub fn new(
        source: Arc<dyn PageSourcePort>,
        cursor: FetchCursor,
        reachable: bool,
        event_tx: mpsc::UnboundedSender<FeedEvent>,
    ) -> Self {
        Self {
            source,
            cursor,
            items: Vec::new(),
            reachable,
            started: false,
            initial_pending: false,
            event_tx,
        }
    }

    /// Accumulated items, in page-fetch order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Current pagination cursor.
    #[must_use]
    pub const fn cursor(&self) -> &FetchCursor {
        &self.cursor
    }

    /// Triggers the initial load once.
    ///
    /// When the network is unreachable the consumer is notified and the
    /// fetch is deferred until reachability flips to true.
    pub async fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        if self.reachable {
            self.fetch_next().await;
        } else {
            info!("Network unreachable at startup, deferring initial load");
            self.initial_pending = true;
            let _ = self.event_tx.send(FeedEvent::NetworkUnavailable);
        }
    }

    /// Near-end trigger: fetches the next page when the reported row is
    /// [`NEAR_END_OFFSET`] positions from the end of the consumer's list.
    ///
    /// A no-op once the cursor is exhausted. Triggered while unreachable,
    /// it surfaces [`FeedEvent::NetworkUnavailable`] instead of fetching.
    pub async fn row_visible(&mut self, index: usize, total: usize) {
        if total < NEAR_END_OFFSET || index + NEAR_END_OFFSET != total {
            return;
        }
        if self.cursor.is_exhausted() {
            return;
        }
        if !self.reachable {
            let _ = self.event_tx.send(FeedEvent::NetworkUnavailable);
            return;
        }

        self.fetch_next().await;
    }

    /// Applies a reachability transition.
    ///
    /// A false-to-true transition releases a deferred initial load exactly
    /// once. A true-to-false transition surfaces the unavailable notice;
    /// it never cancels an in-flight fetch.
    pub async fn set_reachable(&mut self, value: bool) {
        let was = self.reachable;
        self.reachable = value;

        if value && !was && self.initial_pending {
            self.initial_pending = false;
            info!("Network became reachable, running deferred initial load");
            self.fetch_next().await;
        } else if was && !value {
            info!("Network became unreachable");
            let _ = self.event_tx.send(FeedEvent::NetworkUnavailable);
        }
    }

    async fn fetch_next(&mut self) {
        let (start, end) = self.cursor.window();
        debug!(start, end, "Fetching page");

        match self.source.fetch_page(&self.cursor).await {
            Ok(page) => {
                // Advance only on success; a failed window is retried by
                // the next trigger.
                self.cursor.advance();
                debug!(start, count = page.len(), "Page fetched");
                self.items.extend(page);
                let _ = self
                    .event_tx
                    .send(FeedEvent::ListChanged(self.items.clone()));
            }
            Err(e) => {
                warn!(start, error = %e, "Page fetch failed");
                let _ = self.event_tx.send(FeedEvent::FetchFailed(e));
            }
        }
    }
}

/// Spawns the feed worker on the current tokio runtime.
///
/// The worker owns the [`PagedFeed`], processes commands one at a time and
/// folds reachability transitions into the same loop, so at most one page
/// fetch is ever in flight.
pub fn spawn_feed(
    source: Arc<dyn PageSourcePort>,
    connectivity: &dyn ConnectivityPort,
    cursor: FetchCursor,
    event_tx: mpsc::UnboundedSender<FeedEvent>,
) -> FeedHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let feed = PagedFeed::new(source, cursor, connectivity.is_reachable(), event_tx);
    let conn_rx = connectivity.subscribe();

    tokio::spawn(run_worker_loop(feed, rx, conn_rx));

    FeedHandle { tx }
}

async fn run_worker_loop(
    mut feed: PagedFeed,
    mut commands: mpsc::UnboundedReceiver<FeedCommand>,
    mut connectivity: watch::Receiver<bool>,
) {
    let mut watch_open = true;

    loop {
        tokio::select! {
            cmd = commands.recv() => {
                match cmd {
                    Some(FeedCommand::Start) => feed.start().await,
                    Some(FeedCommand::RowVisible { index, total }) => {
                        feed.row_visible(index, total).await;
                    }
                    None => break,
                }
            }
            changed = connectivity.changed(), if watch_open => {
                if changed.is_ok() {
                    let value = *connectivity.borrow_and_update();
                    feed.set_reachable(value).await;
                } else {
                    // Monitor dropped; keep the last known status.
                    watch_open = false;
                }
            }
        }
    }

    debug!("Feed worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockConnectivity, MockPageSource};

    fn new_feed(
        reachable: bool,
    ) -> (
        PagedFeed,
        Arc<MockPageSource>,
        mpsc::UnboundedReceiver<FeedEvent>,
    ) {
        let source = Arc::new(MockPageSource::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let feed = PagedFeed::new(source.clone(), FetchCursor::default(), reachable, tx);
        (feed, source, rx)
    }

    fn advanced_cursor(pages: u32) -> FetchCursor {
        let mut cursor = FetchCursor::new(10, 100);
        for _ in 0..pages {
            cursor.advance();
        }
        cursor
    }

    #[tokio::test]
    async fn test_initial_load_appends_first_page() {
        let (mut feed, source, mut rx) = new_feed(true);

        feed.start().await;

        assert_eq!(feed.items().len(), 10);
        assert_eq!(feed.cursor().start(), 10);
        assert_eq!(source.windows(), vec![(0, 10)]);

        match rx.try_recv().unwrap() {
            FeedEvent::ListChanged(list) => assert_eq!(list.len(), 10),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_start_is_one_shot() {
        let (mut feed, source, _rx) = new_feed(true);

        feed.start().await;
        feed.start().await;

        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_near_end_trigger_fetches_next_page() {
        let (mut feed, source, _rx) = new_feed(true);
        feed.start().await;

        feed.row_visible(8, 10).await;

        assert_eq!(feed.items().len(), 20);
        assert_eq!(source.windows(), vec![(0, 10), (10, 20)]);
    }

    #[tokio::test]
    async fn test_rows_away_from_end_are_no_ops() {
        let (mut feed, source, _rx) = new_feed(true);
        feed.start().await;

        feed.row_visible(0, 10).await;
        feed.row_visible(5, 10).await;
        feed.row_visible(9, 10).await;

        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_tiny_list_does_not_underflow() {
        let (mut feed, source, _rx) = new_feed(true);

        feed.row_visible(0, 0).await;
        feed.row_visible(0, 1).await;

        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_cursor_and_list() {
        let (mut feed, source, mut rx) = new_feed(true);
        source.set_should_fail(true);

        feed.start().await;

        assert!(feed.items().is_empty());
        assert_eq!(feed.cursor().start(), 0);
        match rx.try_recv().unwrap() {
            FeedEvent::FetchFailed(e) => {
                assert!(matches!(
                    e,
                    crate::domain::errors::FetchError::InvalidResponse { status: 404 }
                ));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_window_is_retried_on_next_trigger() {
        let (mut feed, source, _rx) = new_feed(true);
        feed.start().await;

        source.set_should_fail(true);
        feed.row_visible(8, 10).await;
        assert_eq!(feed.cursor().start(), 10);

        source.set_should_fail(false);
        feed.row_visible(8, 10).await;

        // Same window fetched twice after the failure.
        assert_eq!(source.windows(), vec![(0, 10), (10, 20), (10, 20)]);
        assert_eq!(feed.items().len(), 20);
    }

    #[tokio::test]
    async fn test_exhausted_cursor_stops_permanently() {
        let source = Arc::new(MockPageSource::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut feed = PagedFeed::new(source.clone(), advanced_cursor(9), true, tx);

        // One window left: (90, 100).
        feed.row_visible(88, 90).await;
        assert_eq!(source.windows(), vec![(90, 100)]);
        assert_eq!(feed.cursor().start(), 100);

        feed.row_visible(98, 100).await;
        feed.row_visible(98, 100).await;
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_start_defers_until_reachable() {
        let (mut feed, source, mut rx) = new_feed(false);

        feed.start().await;
        assert_eq!(source.call_count(), 0);
        assert!(matches!(
            rx.try_recv().unwrap(),
            FeedEvent::NetworkUnavailable
        ));

        feed.set_reachable(true).await;
        assert_eq!(source.windows(), vec![(0, 10)]);

        // Repeated transitions must not refetch the initial page.
        feed.set_reachable(false).await;
        feed.set_reachable(true).await;
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_connectivity_loss_surfaces_notice() {
        let (mut feed, _source, mut rx) = new_feed(true);
        feed.start().await;
        let _ = rx.try_recv();

        feed.set_reachable(false).await;
        assert!(matches!(
            rx.try_recv().unwrap(),
            FeedEvent::NetworkUnavailable
        ));

        // Repeating the same status is not a transition.
        feed.set_reachable(false).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_trigger_while_unreachable_surfaces_notice() {
        let (mut feed, source, mut rx) = new_feed(true);
        feed.start().await;
        let _ = rx.try_recv();

        feed.set_reachable(false).await;
        let _ = rx.try_recv();
        feed.row_visible(8, 10).await;

        assert_eq!(source.call_count(), 1);
        assert!(matches!(
            rx.try_recv().unwrap(),
            FeedEvent::NetworkUnavailable
        ));
    }

    #[tokio::test]
    async fn test_appends_preserve_page_order() {
        let (mut feed, _source, _rx) = new_feed(true);
        feed.start().await;
        feed.row_visible(8, 10).await;
        feed.row_visible(18, 20).await;

        let ids: Vec<u64> = feed.items().iter().map(|i| i.id).collect();
        let expected: Vec<u64> = (1..=30).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_spawned_worker_reacts_to_connectivity() {
        let source = Arc::new(MockPageSource::new());
        let connectivity = MockConnectivity::new(false);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        let handle = spawn_feed(
            source.clone(),
            &connectivity,
            FetchCursor::default(),
            event_tx,
        );

        handle.start();
        assert!(matches!(
            event_rx.recv().await.unwrap(),
            FeedEvent::NetworkUnavailable
        ));

        connectivity.set_reachable(true);
        match event_rx.recv().await.unwrap() {
            FeedEvent::ListChanged(list) => assert_eq!(list.len(), 10),
            other => panic!("unexpected event: {other:?}"),
        }

        handle.row_visible(8, 10);
        match event_rx.recv().await.unwrap() {
            FeedEvent::ListChanged(list) => assert_eq!(list.len(), 20),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
