//! Data models for MyMovies

mod movie;

pub use movie::{Movie, MovieId, MovieRecord};
