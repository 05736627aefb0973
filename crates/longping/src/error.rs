use std::io::Error as IoError;

use thiserror::Error;

/// Errors surfaced by the statistics engine
#[derive(Debug, Error)]
pub enum LongpingError {
    #[error("Failed to resolve host {host}: {source}")]
    Resolution {
        host: String,
        #[source]
        source: IoError,
    },

    #[error("Host {0} resolved to no addresses")]
    NoAddresses(String),

    #[error("Probe round failed: {0}")]
    ProbeTransport(String),

    /// A window store could not place a sample. The store is corrupt.
    #[error("Window of capacity {capacity} rejected a sample")]
    InsertionInvariantViolation { capacity: usize },

    #[error("Host {0} is not registered")]
    NotFound(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl LongpingError {
    /// Whether the registration attempt failed because the name did not resolve
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. } | Self::NoAddresses(_))
    }
}

/// Longping result type
pub type Result<T> = std::result::Result<T, LongpingError>;
