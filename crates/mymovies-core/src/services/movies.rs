//! Movie operations tying the local store to the remote store and search API.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Movie, MovieId, MovieRecord};
use crate::remote::RemoteStoreClient;
use crate::search::SearchClient;
use crate::services::DatabaseService;
use crate::sync::ReconcileSummary;
use crate::{Error, Result};

/// Independent results of deleting a movie remotely and locally.
#[derive(Debug)]
pub struct DeleteOutcome {
    pub remote: Result<()>,
    pub local: Result<()>,
}

impl DeleteOutcome {
    /// Fold into one result, reporting the remote failure first.
    pub fn into_result(self) -> Result<()> {
        self.remote.and(self.local)
    }
}

/// Entry point for user operations and startup reconciliation.
#[derive(Clone)]
pub struct MovieService {
    db: DatabaseService,
    remote: Option<RemoteStoreClient>,
    search: Option<SearchClient>,
    last_search_results: Arc<RwLock<Vec<MovieRecord>>>,
}

impl MovieService {
    pub fn new(
        db: DatabaseService,
        remote: Option<RemoteStoreClient>,
        search: Option<SearchClient>,
    ) -> Self {
        Self {
            db,
            remote,
            search,
            last_search_results: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub const fn database(&self) -> &DatabaseService {
        &self.db
    }

    pub const fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub const fn has_search(&self) -> bool {
        self.search.is_some()
    }

    fn remote(&self) -> Result<&RemoteStoreClient> {
        self.remote
            .as_ref()
            .ok_or_else(|| Error::Config("remote store URL is not configured".to_string()))
    }

    fn search_client(&self) -> Result<&SearchClient> {
        self.search
            .as_ref()
            .ok_or_else(|| Error::Config("search API key is not configured".to_string()))
    }

    /// Search the movie API and replace the last search results on success.
    pub async fn search(&self, term: &str) -> Result<Vec<MovieRecord>> {
        let client = self.search_client()?;
        tracing::debug!("Searching {} for {term:?}", client.endpoint());
        let results = client.search(term).await?;
        *self.last_search_results.write().await = results.clone();
        Ok(results)
    }

    /// Results of the most recent successful search.
    pub async fn last_search_results(&self) -> Vec<MovieRecord> {
        self.last_search_results.read().await.clone()
    }

    /// Save a movie locally, then write it to the remote store.
    ///
    /// An identifier is assigned when the record has none; a missing watched
    /// flag means unwatched. A local failure returns before any network
    /// request. A remote failure is returned but the local write stays.
    pub async fn save(&self, record: MovieRecord) -> Result<Movie> {
        let remote = self.remote()?;
        let title = record.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("movie title cannot be empty".to_string()));
        }

        let movie = Movie::with_id(
            record.identifier.unwrap_or_default(),
            title,
            record.has_watched.unwrap_or(false),
        );

        let movie = self.db.save_movie(&movie).await.inspect_err(|error| {
            tracing::error!("Error saving movie: {error}");
        })?;

        remote.put(&movie.to_record()).await.inspect_err(|error| {
            tracing::warn!(
                "Movie {} saved locally but not remotely: {error}",
                movie.id
            );
        })?;

        tracing::info!("Saved movie {} ({})", movie.id, movie.title);
        Ok(movie)
    }

    /// Set the watched flag locally, then write the movie to the remote store.
    pub async fn set_watched(&self, id: &MovieId, has_watched: bool) -> Result<Movie> {
        let remote = self.remote()?;
        let movie = self.db.set_watched(id, has_watched).await?;
        remote.put(&movie.to_record()).await.inspect_err(|error| {
            tracing::warn!(
                "Movie {} updated locally but not remotely: {error}",
                movie.id
            );
        })?;
        Ok(movie)
    }

    /// Delete a movie remotely and locally.
    ///
    /// Without an identifier nothing is attempted and
    /// [`Error::MissingIdentifier`] is returned. Otherwise both deletes run and
    /// each outcome is reported on its own.
    pub async fn delete(&self, id: Option<&MovieId>) -> Result<DeleteOutcome> {
        let Some(id) = id else {
            tracing::warn!("Movie to delete has no identifier");
            return Err(Error::MissingIdentifier);
        };
        let remote = self.remote()?;

        let remote_result = remote.delete(Some(id)).await;
        if let Err(error) = &remote_result {
            tracing::warn!("Error deleting movie {id} from remote store: {error}");
        }

        let local_result = self.db.delete_movie(id).await;
        if let Err(error) = &local_result {
            tracing::warn!("Error deleting movie {id} locally: {error}");
        }

        Ok(DeleteOutcome {
            remote: remote_result,
            local: local_result,
        })
    }

    /// Pull the full remote collection and reconcile it into the local store.
    pub async fn sync_from_remote(&self) -> Result<ReconcileSummary> {
        let remote = self.remote()?;
        tracing::debug!("Pulling movies from {}", remote.base_url());
        let records = remote.fetch_all().await.inspect_err(|error| {
            tracing::warn!("Error fetching movies from remote store: {error}");
        })?;
        self.db.reconcile(&records).await
    }

    /// List local movies ordered by title.
    pub async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Movie>> {
        self.db.list_movies(limit, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn offline_service() -> MovieService {
        let db = DatabaseService::open_in_memory().await.unwrap();
        MovieService::new(db, None, None)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn operations_needing_remote_fail_without_configuration() {
        let service = offline_service().await;
        assert!(!service.has_remote());
        assert!(!service.has_search());
        assert!(matches!(
            service.save(MovieRecord::new("Heat")).await,
            Err(Error::Config(_))
        ));
        assert!(matches!(
            service.sync_from_remote().await,
            Err(Error::Config(_))
        ));
        assert!(matches!(service.search("heat").await, Err(Error::Config(_))));
        assert!(service.list(10, 0).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_without_identifier_is_reported_before_configuration() {
        let service = offline_service().await;
        assert!(matches!(
            service.delete(None).await,
            Err(Error::MissingIdentifier)
        ));
        assert!(matches!(
            service.delete(Some(&MovieId::new())).await,
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn delete_outcome_prefers_remote_error() {
        let outcome = DeleteOutcome {
            remote: Err(Error::MissingIdentifier),
            local: Err(Error::NotFound("x".to_string())),
        };
        assert!(matches!(outcome.into_result(), Err(Error::MissingIdentifier)));

        let outcome = DeleteOutcome {
            remote: Ok(()),
            local: Err(Error::NotFound("x".to_string())),
        };
        assert!(matches!(outcome.into_result(), Err(Error::NotFound(_))));
    }
}
