//! Database layer for MyMovies

mod change_set;
mod connection;
mod migrations;
mod repository;

pub use change_set::ChangeSet;
pub use connection::Database;
pub use repository::{LibSqlMovieRepository, MovieRepository};
