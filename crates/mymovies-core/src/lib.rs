//! mymovies-core - Core library for MyMovies
//!
//! This crate contains the movie models, the local libSQL store, the remote
//! store and search clients, and the reconciliation that pulls remote movies
//! into the local store.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod search;
pub mod services;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Movie, MovieId, MovieRecord};
pub use sync::ReconcileSummary;
