//! Shared database service wrapper used across clients.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{Database, LibSqlMovieRepository, MovieRepository};
use crate::models::{Movie, MovieId, MovieRecord};
use crate::sync::{self, ReconcileSummary};
use crate::Result;

/// Thread-safe service for DB and repository operations.
///
/// All access goes through one mutex, so a reconciliation pass and a user
/// edit never interleave their writes.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    ///
    /// A file that is not a database is moved aside and a fresh one created.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = match Database::open(&db_path).await {
            Ok(db) => db,
            Err(error) if Self::is_corrupted_db_error(&error) => {
                tracing::warn!(
                    "Local database at {} is unreadable: {}. Moving it aside and starting fresh.",
                    db_path.display(),
                    error
                );
                Self::quarantine_corrupted_db_files(&db_path)?;
                Database::open(&db_path).await?
            }
            Err(error) => return Err(error),
        };

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Path of the backing file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn is_corrupted_db_error(error: &crate::Error) -> bool {
        error
            .to_string()
            .to_ascii_lowercase()
            .contains("file is not a database")
    }

    fn quarantine_corrupted_db_files(db_path: &Path) -> Result<()> {
        if db_path.exists() {
            let timestamp = chrono::Utc::now().timestamp_millis();
            let base_name = db_path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("mymovies.db");
            let backup_path = db_path.with_file_name(format!("{base_name}.corrupt-{timestamp}"));

            std::fs::rename(db_path, &backup_path)?;
            tracing::warn!(
                "Moved corrupted local DB file from {} to {}",
                db_path.display(),
                backup_path.display()
            );
        }

        let Some(parent) = db_path.parent() else {
            return Ok(());
        };
        let Some(base_name) = db_path.file_name().and_then(|name| name.to_str()) else {
            return Ok(());
        };
        // WAL and shared-memory sidecars
        let sidecar_prefix = format!("{base_name}-");

        for entry in std::fs::read_dir(parent)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if file_name.starts_with(&sidecar_prefix) {
                let path = entry.path();
                std::fs::remove_file(&path)?;
                tracing::warn!("Removed stale database file {}", path.display());
            }
        }

        Ok(())
    }

    /// List movies ordered by title.
    pub async fn list_movies(&self, limit: usize, offset: usize) -> Result<Vec<Movie>> {
        let db = self.db.lock().await;
        let repo = LibSqlMovieRepository::new(db.connection());
        repo.list(limit, offset).await
    }

    /// Fetch a movie by id.
    pub async fn get_movie(&self, id: &MovieId) -> Result<Option<Movie>> {
        let db = self.db.lock().await;
        let repo = LibSqlMovieRepository::new(db.connection());
        repo.get(id).await
    }

    /// Insert a movie, or replace the one with the same identifier.
    ///
    /// Returns the stored row, which keeps its original `created_at` when the
    /// identifier already existed.
    pub async fn save_movie(&self, movie: &Movie) -> Result<Movie> {
        let db = self.db.lock().await;
        let repo = LibSqlMovieRepository::new(db.connection());
        repo.upsert(movie).await?;
        repo.get(&movie.id).await?.ok_or_else(|| {
            crate::Error::Persistence(format!("movie {} missing after save", movie.id))
        })
    }

    /// Overwrite the watched flag of a stored movie.
    pub async fn set_watched(&self, id: &MovieId, has_watched: bool) -> Result<Movie> {
        let db = self.db.lock().await;
        let repo = LibSqlMovieRepository::new(db.connection());
        repo.update_watched(id, has_watched).await
    }

    /// Delete a movie.
    pub async fn delete_movie(&self, id: &MovieId) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlMovieRepository::new(db.connection());
        repo.delete(id).await
    }

    /// List movie IDs that start with the given prefix.
    pub async fn list_movie_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let db = self.db.lock().await;
        let repo = LibSqlMovieRepository::new(db.connection());
        repo.list_ids_by_prefix(prefix, limit).await
    }

    /// Run one reconciliation pass while holding the database lock.
    pub async fn reconcile(
        &self,
        remote: &BTreeMap<String, MovieRecord>,
    ) -> Result<ReconcileSummary> {
        let db = self.db.lock().await;
        let repo = LibSqlMovieRepository::new(db.connection());
        sync::reconcile(&repo, remote).await
    }
}
