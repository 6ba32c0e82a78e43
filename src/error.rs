//! Error types for newswire
//!
//! Failures are always reported upward as values; nothing in this crate is
//! fatal to the process. The query pipeline surfaces a single [`Error`] per
//! fetch, while the image pipeline fans a [`ImageFetchError`] out to every
//! waiter of a shared in-flight fetch.

use thiserror::Error;

/// Result type alias for newswire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for newswire
///
/// Each variant carries enough context for the consumer to decide on
/// user-visible messaging (e.g. "no connection" vs "no results").
#[derive(Debug, Error)]
pub enum Error {
    /// A connection could not be established (host unreachable, DNS failure,
    /// no network)
    #[error("network unavailable: could not connect to {url}")]
    NetworkUnavailable {
        /// The URL the connection attempt was made against
        url: String,
    },

    /// The request exceeded its configured deadline
    #[error("request timed out: {url}")]
    Timeout {
        /// The URL whose request timed out
        url: String,
    },

    /// The server answered with a non-2xx status code
    #[error("HTTP error {status} from {url}")]
    Http {
        /// The HTTP status code returned by the server
        status: u16,
        /// The URL that produced the error response
        url: String,
    },

    /// The server answered 2xx but the body was empty or absent
    #[error("no response received")]
    EmptyResponse,

    /// The top-level structure of the search response is missing or has the
    /// wrong shape; the whole batch is discarded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The supplied URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level error not covered by a more specific variant
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Image bytes were downloaded but could not be decoded
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure delivered to every waiter of a shared image fetch
///
/// The image pipeline resolves all concurrent requesters of the same article
/// id with one shared outcome, so the error must be cloneable. Transport
/// details are flattened to a message; the distinction that matters to
/// callers is fetch vs decode vs abandonment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageFetchError {
    /// Download failed (bad URL, connection, timeout, or non-2xx status)
    #[error("image fetch failed: {0}")]
    Fetch(String),

    /// Bytes arrived but were not a decodable image
    #[error("image decode failed: {0}")]
    Decode(String),

    /// The in-flight fetch was dropped before delivering an outcome
    #[error("image fetch abandoned before completion")]
    Abandoned,
}

impl From<&Error> for ImageFetchError {
    fn from(err: &Error) -> Self {
        match err {
            Error::ImageDecode(msg) => ImageFetchError::Decode(msg.clone()),
            other => ImageFetchError::Fetch(other.to_string()),
        }
    }
}
