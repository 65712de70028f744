//! Error types for resource loading.

use thiserror::Error;
use url::Url;

/// Result type for resource loading.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while resolving a resource into a stream.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The load was aborted by the caller or by a descriptor change.
    #[error("load cancelled")]
    Cancelled,

    /// Connection, timeout or body transfer failure.
    #[error("error getting stream for {locator}: {source}")]
    Transport {
        locator: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("error getting stream for {locator}: HTTP {status}")]
    Status { locator: Url, status: u16 },

    /// The locator is not an absolute URI.
    #[error("invalid locator {input:?}: {source}")]
    InvalidLocator {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Local file access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// True for caller- or descriptor-triggered aborts.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadError::Cancelled)
    }

    /// True for network-side failures (transport or HTTP status).
    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::Transport { .. } | LoadError::Status { .. })
    }
}
