//! Page fetch error types.

use thiserror::Error;

/// Errors surfaced by a page fetch.
///
/// None of these stop the pagination loop: the cursor stays in place on
/// failure and the same window is retried on the next near-end trigger.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The configured endpoint is not a valid URL.
    #[error("invalid endpoint URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// The server answered with a status other than 200.
    #[error("unexpected response status: {status}")]
    InvalidResponse {
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// The response body was not a well-formed item array.
    #[error("failed to decode page body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport-level failure, wrapping the underlying cause.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    /// Creates an invalid-URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub const fn invalid_response(status: u16) -> Self {
        Self::InvalidResponse { status }
    }

    /// Returns whether the error came from the transport layer.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
