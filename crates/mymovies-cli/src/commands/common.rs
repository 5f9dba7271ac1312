use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use mymovies_core::config::ClientConfig;
use mymovies_core::services::{DatabaseService, MovieService};
use mymovies_core::{Movie, MovieId, MovieRecord, ReconcileSummary};
use serde::Serialize;

use crate::config_file::CliConfig;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct MovieListItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "hasWatched")]
    pub has_watched: bool,
    pub updated_at: i64,
    pub relative_time: String,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("MYMOVIES_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI data directory"))
        .join("mymovies")
        .join("mymovies.db")
}

pub fn load_client_config() -> Result<ClientConfig, CliError> {
    Ok(CliConfig::load().map_err(CliError::Config)?.client_config())
}

pub async fn open_service(db_path: &Path) -> Result<MovieService, CliError> {
    open_service_with_config(db_path, &load_client_config()?).await
}

pub async fn open_service_with_config(
    db_path: &Path,
    config: &ClientConfig,
) -> Result<MovieService, CliError> {
    let db = DatabaseService::open_path(db_path.to_path_buf()).await?;
    let remote = config.remote_client()?;
    let search = config.search_client()?;
    Ok(MovieService::new(db, remote, search))
}

/// Pull remote movies before a command runs. Failures only warn.
pub async fn startup_sync(service: &MovieService) {
    if !service.has_remote() {
        tracing::debug!("No remote store configured; skipping startup sync");
        return;
    }

    match service.sync_from_remote().await {
        Ok(summary) => tracing::debug!("Startup sync finished: {}", format_summary(&summary)),
        Err(error) if error.is_local() => {
            tracing::error!("Startup sync could not update the local store: {error}");
        }
        Err(error) => tracing::warn!("Startup sync failed, continuing with local data: {error}"),
    }
}

pub async fn resolve_movie(movie_query: &str, db: &DatabaseService) -> Result<Movie, CliError> {
    if let Ok(movie_id) = movie_query.parse::<MovieId>() {
        if let Some(movie) = db.get_movie(&movie_id).await? {
            return Ok(movie);
        }
    }

    let matching_ids = db.list_movie_ids_by_prefix(movie_query, 3).await?;

    match matching_ids.len() {
        0 => Err(CliError::MovieNotFound(movie_query.to_string())),
        1 => {
            let resolved_id = matching_ids[0]
                .parse::<MovieId>()
                .map_err(|_| CliError::MovieNotFound(movie_query.to_string()))?;
            db.get_movie(&resolved_id)
                .await?
                .ok_or_else(|| CliError::MovieNotFound(movie_query.to_string()))
        }
        _ => {
            let options = matching_ids
                .iter()
                .take(3)
                .map(|id| id.chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousMovieId(format!(
                "ID prefix '{movie_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn format_movie_lines(movies: &[Movie]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    movies
        .iter()
        .map(|movie| {
            let id = movie.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let mark = if movie.has_watched { "[x]" } else { "[ ]" };
            let title = truncate(&movie.title, 40);
            let relative_time = format_relative_time(movie.updated_at, now_ms);
            format!("{short_id:<13}  {mark} {title:<40}  {relative_time}")
        })
        .collect()
}

pub fn format_search_lines(records: &[MovieRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| format!("{:>3}. {}", index + 1, record.title))
        .collect()
}

pub fn movie_to_list_item(movie: &Movie) -> MovieListItem {
    let now_ms = Utc::now().timestamp_millis();
    MovieListItem {
        id: movie.id.to_string(),
        title: movie.title.clone(),
        has_watched: movie.has_watched,
        updated_at: movie.updated_at,
        relative_time: format_relative_time(movie.updated_at, now_ms),
    }
}

pub fn format_summary(summary: &ReconcileSummary) -> String {
    format!(
        "{} created, {} updated, {} unchanged, {} skipped",
        summary.created, summary.updated, summary.unchanged, summary.skipped
    )
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn normalize_title(parts: &[String]) -> Result<String, CliError> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_search_term(parts: &[String]) -> Result<String, CliError> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchTerm)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_movie_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyMovieId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Map a missing remote client onto the CLI's setup hint.
pub fn require_remote(service: &MovieService) -> Result<(), CliError> {
    if service.has_remote() {
        Ok(())
    } else {
        Err(CliError::RemoteNotConfigured)
    }
}
