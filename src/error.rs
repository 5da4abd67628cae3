//! Error types for the board engine

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur while mutating or persisting the board
#[derive(Debug, Error)]
pub enum BoardError {
    /// Transport-level failure talking to the record service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Record service answered with a non-success status
    #[error("{method} {url} returned {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
    },

    /// Malformed record payload
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Card not found
    #[error("card not found: {id}")]
    CardNotFound { id: String },

    /// Failure reported by a non-HTTP record service
    #[error("remote error: {message}")]
    Remote { message: String },

    /// Some calls of a concurrent batch failed; the others were applied
    #[error("{failed} of {total} remote calls failed, first: {first}")]
    Batch {
        failed: usize,
        total: usize,
        first: Box<BoardError>,
    },

    /// Configuration error
    #[error("config error: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardError {
    /// Create a remote error
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the request never produced a usable response
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_decode(),
            Self::Remote { .. } => true,
            Self::Batch { first, .. } => first.is_transport(),
            _ => false,
        }
    }
}
