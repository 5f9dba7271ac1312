use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] mymovies_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No movie title provided")]
    EmptyTitle,
    #[error("Movie ID cannot be empty")]
    EmptyMovieId,
    #[error("Search term cannot be empty")]
    EmptySearchTerm,
    #[error("Movie not found for id/prefix: {0}")]
    MovieNotFound(String),
    #[error("{0}")]
    AmbiguousMovieId(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Remote store is not configured. Run `mymovies config init --store-url <URL>` or set MYMOVIES_STORE_URL."
    )]
    RemoteNotConfigured,
    #[error(
        "Movie search is not configured. Run `mymovies config init --api-key <KEY>` or set MYMOVIES_API_KEY."
    )]
    SearchNotConfigured,
}
