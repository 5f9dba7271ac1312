//! Staged local store changes applied as one unit

use crate::models::Movie;

/// Inserts and updates staged against the local store.
///
/// Nothing touches the database until the set is applied through
/// [`MovieRepository::apply`](super::MovieRepository::apply), which commits
/// all of it or none of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Movies present remotely but not locally
    pub inserts: Vec<Movie>,
    /// Local movies carrying the remote title and watched flag
    pub updates: Vec<Movie>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, movie: Movie) {
        self.inserts.push(movie);
    }

    pub fn update(&mut self, movie: Movie) {
        self.updates.push(movie);
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len()
    }
}
