use mymovies_core::services::MovieService;

use crate::commands::common::{normalize_movie_identifier, require_remote, resolve_movie};
use crate::error::CliError;

pub async fn run_delete(id: &str, service: &MovieService) -> Result<(), CliError> {
    let normalized_id = normalize_movie_identifier(id)?;
    require_remote(service)?;
    let movie = resolve_movie(&normalized_id, service.database()).await?;

    let outcome = service.delete(Some(&movie.id)).await?;
    if outcome.remote.is_err() && outcome.local.is_ok() {
        eprintln!("Deleted locally; the remote copy may reappear on the next sync.");
    }
    outcome.into_result()?;

    println!("{}", movie.id);
    Ok(())
}
