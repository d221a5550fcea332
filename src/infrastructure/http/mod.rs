//! HTTP adapters.

mod client;

pub use client::JsonApiClient;
