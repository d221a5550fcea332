//! pagefeed - a paginated REST feed client with a two-tier image cache.
//!
//! The crate accumulates a remote list resource page by page, driven by
//! scroll-position reports and gated on network reachability, and resolves
//! images through a memory-over-disk cache with network fallback. UI
//! concerns stay outside; consumers integrate through event channels.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the feed service and its events.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "pagefeed";
