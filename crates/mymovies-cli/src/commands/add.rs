use mymovies_core::services::MovieService;
use mymovies_core::MovieRecord;

use crate::commands::common::{normalize_title, require_remote};
use crate::error::CliError;

pub async fn run_add(
    title_parts: &[String],
    watched: bool,
    service: &MovieService,
) -> Result<(), CliError> {
    let title = normalize_title(title_parts)?;
    require_remote(service)?;

    let mut record = MovieRecord::new(title);
    record.has_watched = Some(watched);
    let movie = service.save(record).await?;

    println!("{}", movie.id);
    Ok(())
}
