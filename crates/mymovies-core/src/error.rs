//! Error types for mymovies-core

use thiserror::Error;

/// Result type alias using mymovies-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mymovies-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Network failure talking to the search API or the remote store
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote endpoint answered with a non-success status
    #[error("Remote returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Malformed JSON or schema mismatch
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Remote write or delete attempted on a record without an identifier
    #[error("Movie has no identifier")]
    MissingIdentifier,

    /// Local commit failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Movie not found
    #[error("Movie not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error originated in the local store rather than a remote.
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::LibSql(_) | Self::Io(_) | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_local_and_remote_errors() {
        assert!(Error::Persistence("commit failed".to_string()).is_local());
        assert!(Error::NotFound("id".to_string()).is_local());
        assert!(!Error::MissingIdentifier.is_local());
        assert!(!Error::Http {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_local());
    }
}
