use mymovies_core::services::MovieService;

use crate::commands::common::{normalize_movie_identifier, require_remote, resolve_movie};
use crate::error::CliError;

pub async fn run_watched(id: &str, unset: bool, service: &MovieService) -> Result<(), CliError> {
    let normalized_id = normalize_movie_identifier(id)?;
    require_remote(service)?;
    let movie = resolve_movie(&normalized_id, service.database()).await?;

    let updated = service.set_watched(&movie.id, !unset).await?;
    let state = if updated.has_watched {
        "watched"
    } else {
        "unwatched"
    };
    println!("{} {state}", updated.id);
    Ok(())
}
