//! Common error types used throughout marquee.
//!
//! The two failure classes that matter to a view pass are provider errors and
//! cache errors; both are non-fatal and the pass continues with whatever data
//! is available. The remaining variants cover the tool surface around it.

/// Common error type for marquee.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single source's fetch failed (network, HTTP status, or unparseable
    /// response). Never fatal to a pass; the source contributes zero records.
    #[error("Source '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    /// Reading or writing the snapshot cache failed. Never fatal; an unread
    /// cache is treated as a miss, a failed save still displays fresh results.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The requested genre is not configured.
    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new Provider error.
    pub fn provider<S: Into<String>, M: Into<String>>(source: S, message: M) -> Self {
        Self::Provider {
            provider: source.into(),
            message: message.into(),
        }
    }

    /// Create a new Cache error.
    pub fn cache<S: Into<String>>(msg: S) -> Self {
        Self::Cache(msg.into())
    }

    /// Create a new UnknownGenre error.
    pub fn unknown_genre<S: Into<String>>(label: S) -> Self {
        Self::UnknownGenre(label.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
