use serde_json::{Value, json};
use thiserror::Error;

/// Errors from [`crate::directions::DirectionsProvider::directions`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectionsError {
    /// The request could not reach the service.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    ///
    /// `body` holds the service's JSON error payload, or the raw text wrapped
    /// in a JSON string when the body was not JSON.
    #[error("{url} returned HTTP {status}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error payload returned by the service.
        body: Value,
    },
    /// The response body could not be decoded.
    #[error("failed to parse directions response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

impl DirectionsError {
    /// Diagnostic payload for this failure, suitable for echoing to clients.
    ///
    /// HTTP failures return the service's own payload; everything else is
    /// summarised as `{"error": <message>}`.
    #[must_use]
    pub fn details(&self) -> Value {
        match self {
            Self::Http { body, .. } => body.clone(),
            other => json!({ "error": other.to_string() }),
        }
    }
}
