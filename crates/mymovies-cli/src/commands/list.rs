use mymovies_core::services::MovieService;

use crate::commands::common::{format_movie_lines, movie_to_list_item, MovieListItem};
use crate::error::CliError;

pub async fn run_list(limit: usize, as_json: bool, service: &MovieService) -> Result<(), CliError> {
    let movies = service.list(limit, 0).await?;

    if as_json {
        let json_items = movies
            .iter()
            .map(movie_to_list_item)
            .collect::<Vec<MovieListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if movies.is_empty() {
        println!("No movies saved yet.");
        return Ok(());
    }

    for line in format_movie_lines(&movies) {
        println!("{line}");
    }
    Ok(())
}
