//! Movie repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use libsql::params::Params;
use libsql::{Connection, Value};

use super::ChangeSet;
use crate::error::{Error, Result};
use crate::models::{Movie, MovieId};

/// Bound parameters per `IN (...)` lookup, below `SQLite`'s variable limit.
const LOOKUP_CHUNK_SIZE: usize = 500;

const MOVIE_COLUMNS: &str = "identifier, title, has_watched, created_at, updated_at";

/// Trait for movie storage operations (async)
#[allow(async_fn_in_trait)]
pub trait MovieRepository {
    /// Insert a new movie
    async fn insert(&self, movie: &Movie) -> Result<()>;

    /// Insert a movie or replace the stored row with the same identifier
    async fn upsert(&self, movie: &Movie) -> Result<()>;

    /// Get a movie by ID
    async fn get(&self, id: &MovieId) -> Result<Option<Movie>>;

    /// All stored movies whose identifier is in `ids`
    async fn find_by_identifiers(&self, ids: &[MovieId]) -> Result<Vec<Movie>>;

    /// List movies ordered by title
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Movie>>;

    /// Identifiers starting with `prefix`, at most `limit` of them
    async fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;

    /// Overwrite title and watched flag of a stored movie
    async fn update(&self, id: &MovieId, title: &str, has_watched: bool) -> Result<Movie>;

    /// Overwrite only the watched flag of a stored movie
    async fn update_watched(&self, id: &MovieId, has_watched: bool) -> Result<Movie>;

    /// Delete a movie
    async fn delete(&self, id: &MovieId) -> Result<()>;

    /// Apply a staged change set in a single transaction.
    ///
    /// On any failure the transaction is rolled back and the store is left
    /// exactly as it was.
    async fn apply(&self, changes: &ChangeSet) -> Result<()>;
}

/// libSQL implementation of `MovieRepository`
pub struct LibSqlMovieRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlMovieRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a movie from a database row
    fn parse_movie(row: &libsql::Row) -> Result<Movie> {
        let id: String = row.get(0)?;
        Ok(Movie {
            id: id
                .parse()
                .map_err(|_| Error::Persistence(format!("Invalid stored identifier: {id}")))?,
            title: row.get(1)?,
            has_watched: row.get::<i64>(2)? != 0,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    async fn collect_movies(&self, sql: &str, params: Params) -> Result<Vec<Movie>> {
        let mut rows = self.conn.query(sql, params).await?;
        let mut movies = Vec::new();
        while let Some(row) = rows.next().await? {
            movies.push(Self::parse_movie(&row)?);
        }
        Ok(movies)
    }

    async fn insert_row(&self, movie: &Movie) -> Result<()> {
        self.conn
            .execute(
                &format!("INSERT INTO movies ({MOVIE_COLUMNS}) VALUES (?, ?, ?, ?, ?)"),
                libsql::params![
                    movie.id.as_str(),
                    movie.title.clone(),
                    i64::from(movie.has_watched),
                    movie.created_at,
                    movie.updated_at
                ],
            )
            .await?;
        Ok(())
    }

    async fn update_row(&self, movie: &Movie) -> Result<u64> {
        let rows = self
            .conn
            .execute(
                "UPDATE movies SET title = ?, has_watched = ?, updated_at = ? WHERE identifier = ?",
                libsql::params![
                    movie.title.clone(),
                    i64::from(movie.has_watched),
                    movie.updated_at,
                    movie.id.as_str()
                ],
            )
            .await?;
        Ok(rows)
    }

    async fn apply_staged(&self, changes: &ChangeSet) -> Result<()> {
        for movie in &changes.inserts {
            self.insert_row(movie).await?;
        }
        for movie in &changes.updates {
            if self.update_row(movie).await? == 0 {
                return Err(Error::NotFound(movie.id.to_string()));
            }
        }
        Ok(())
    }
}

/// Escape `LIKE` wildcards so user input only ever matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl MovieRepository for LibSqlMovieRepository<'_> {
    async fn insert(&self, movie: &Movie) -> Result<()> {
        self.insert_row(movie).await
    }

    async fn upsert(&self, movie: &Movie) -> Result<()> {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO movies ({MOVIE_COLUMNS}) VALUES (?, ?, ?, ?, ?)
                     ON CONFLICT(identifier) DO UPDATE SET
                        title = excluded.title,
                        has_watched = excluded.has_watched,
                        updated_at = excluded.updated_at"
                ),
                libsql::params![
                    movie.id.as_str(),
                    movie.title.clone(),
                    i64::from(movie.has_watched),
                    movie.created_at,
                    movie.updated_at
                ],
            )
            .await?;
        Ok(())
    }

    async fn get(&self, id: &MovieId) -> Result<Option<Movie>> {
        let movies = self
            .collect_movies(
                &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE identifier = ?"),
                Params::Positional(vec![Value::Text(id.as_str())]),
            )
            .await?;
        Ok(movies.into_iter().next())
    }

    async fn find_by_identifiers(&self, ids: &[MovieId]) -> Result<Vec<Movie>> {
        let mut found = Vec::new();
        for chunk in ids.chunks(LOOKUP_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let values = chunk
                .iter()
                .map(|id| Value::Text(id.as_str()))
                .collect::<Vec<_>>();
            let movies = self
                .collect_movies(
                    &format!(
                        "SELECT {MOVIE_COLUMNS} FROM movies WHERE identifier IN ({placeholders})"
                    ),
                    Params::Positional(values),
                )
                .await?;
            found.extend(movies);
        }
        Ok(found)
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Movie>> {
        self.collect_movies(
            &format!(
                "SELECT {MOVIE_COLUMNS} FROM movies
                 ORDER BY title COLLATE NOCASE ASC, identifier ASC
                 LIMIT ? OFFSET ?"
            ),
            Params::Positional(vec![
                Value::Integer(limit as i64),
                Value::Integer(offset as i64),
            ]),
        )
        .await
    }

    async fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let pattern = format!("{}%", escape_like(&prefix.to_ascii_uppercase()));
        let mut rows = self
            .conn
            .query(
                "SELECT identifier FROM movies WHERE identifier LIKE ? ESCAPE '\\'
                 ORDER BY identifier LIMIT ?",
                libsql::params![pattern, limit as i64],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }

    async fn update(&self, id: &MovieId, title: &str, has_watched: bool) -> Result<Movie> {
        let mut movie = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        movie.title = title.to_string();
        movie.has_watched = has_watched;
        movie.updated_at = chrono::Utc::now().timestamp_millis();

        if self.update_row(&movie).await? == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(movie)
    }

    async fn update_watched(&self, id: &MovieId, has_watched: bool) -> Result<Movie> {
        let rows = self
            .conn
            .execute(
                "UPDATE movies SET has_watched = ?, updated_at = ? WHERE identifier = ?",
                libsql::params![
                    i64::from(has_watched),
                    chrono::Utc::now().timestamp_millis(),
                    id.as_str()
                ],
            )
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        self.get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM movies WHERE identifier = ?",
                libsql::params![id.as_str()],
            )
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        if let Err(error) = self.apply_staged(changes).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(Error::Persistence(format!(
                "change set rolled back: {error}"
            )));
        }

        if let Err(error) = self.conn.execute("COMMIT", ()).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(Error::Persistence(format!("commit failed: {error}")));
        }

        tracing::debug!(
            inserts = changes.inserts.len(),
            updates = changes.updates.len(),
            "Committed change set"
        );
        Ok(())
    }
}
