//! Services shared by every MyMovies front end.

mod database;
mod movies;

pub use database::DatabaseService;
pub use movies::{DeleteOutcome, MovieService};
