use mymovies_core::services::MovieService;

use crate::commands::common::{format_search_lines, normalize_search_term};
use crate::error::CliError;

pub async fn run_search(
    term_parts: &[String],
    as_json: bool,
    service: &MovieService,
) -> Result<(), CliError> {
    let term = normalize_search_term(term_parts)?;
    if !service.has_search() {
        return Err(CliError::SearchNotConfigured);
    }

    let results = service.search(&term).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No movies found for '{term}'.");
        return Ok(());
    }

    for line in format_search_lines(&results) {
        println!("{line}");
    }
    Ok(())
}
