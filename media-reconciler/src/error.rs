//! Common error types for the reconciliation engine

use thiserror::Error;

/// Common result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error types
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error (request never produced a usable response)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Object store API rejected the request
    #[error("Storage error {status}: {message}")]
    Storage { status: u16, message: String },

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a retry can reasonably change the outcome.
    ///
    /// `NotFound` is a terminal state, and config/serialization errors are
    /// deterministic; everything touching the network or the database may be
    /// a transient hiccup.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(_) | Error::Storage { .. } | Error::Io(_) => true,
            Error::Database(sqlx::Error::RowNotFound) => false,
            Error::Database(_) => true,
            Error::NotFound(_) | Error::Serialization(_) | Error::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(Error::Http("connection reset".into()).is_transient());
        assert!(Error::Storage { status: 503, message: "unavailable".into() }.is_transient());
        assert!(!Error::NotFound("player x".into()).is_transient());
        assert!(!Error::Config("bad toml".into()).is_transient());
        assert!(!Error::Database(sqlx::Error::RowNotFound).is_transient());
    }
}
