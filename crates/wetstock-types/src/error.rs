//! Error types for the wetstock clients.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for wetstock operations.
pub type Result<T> = std::result::Result<T, WetstockError>;

/// Errors that can occur while talking to the wetstock services.
#[derive(Error, Debug)]
pub enum WetstockError {
    /// Transport-level failure (connect, timeout, request I/O) after
    /// retries were exhausted.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a status the endpoint treats as fatal.
    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        /// HTTP status code returned by the service.
        status: u16,
        /// Endpoint path the request was sent to.
        endpoint: String,
    },

    /// The response body could not be decoded as the expected JSON shape.
    #[error("undecodable response from {endpoint}: {source}")]
    Decode {
        /// Endpoint path the response came from.
        endpoint: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A named timezone was not recognized.
    #[error("unknown timezone: {0}")]
    UnknownZone(String),

    /// A required environment variable was not set.
    #[error("missing environment variable {0}")]
    MissingEnv(String),

    /// Invalid time window.
    #[error(transparent)]
    Window(#[from] WindowError),
}

/// Error for invalid time windows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Window start is after its end.
    #[error("invalid window: {start} > {end}")]
    InvalidWindow {
        /// The window start.
        start: DateTime<Utc>,
        /// The window end.
        end: DateTime<Utc>,
    },
}
