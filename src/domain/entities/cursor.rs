//! Pagination cursor.

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default offset at which pagination stops permanently.
pub const DEFAULT_MAX_START: u32 = 100;

/// Offset window state for the paginated list resource.
///
/// `start` only ever moves forward, by `page_size` per successful fetch.
/// Once `start` reaches `max_start` the feed is complete and no further
/// fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCursor {
    start: u32,
    page_size: u32,
    max_start: u32,
}

impl FetchCursor {
    /// Creates a cursor at offset zero.
    #[must_use]
    pub const fn new(page_size: u32, max_start: u32) -> Self {
        Self {
            start: 0,
            page_size,
            max_start,
        }
    }

    /// Current window as `(start, end)` query values.
    #[must_use]
    pub const fn window(&self) -> (u32, u32) {
        (self.start, self.start + self.page_size)
    }

    /// Current start offset.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Number of items requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Advances the window by one page. Only called after a successful
    /// fetch; a failed page keeps the cursor in place so the same window
    /// is retried on the next trigger.
    pub const fn advance(&mut self) {
        self.start += self.page_size;
    }

    /// Returns true once the feed has no more pages to request.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.start >= self.max_start
    }
}

impl Default for FetchCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_MAX_START)
    }
}
