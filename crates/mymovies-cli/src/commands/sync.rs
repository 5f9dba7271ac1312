use mymovies_core::services::MovieService;

use crate::commands::common::{format_summary, require_remote};
use crate::error::CliError;

pub async fn run_sync(as_json: bool, service: &MovieService) -> Result<(), CliError> {
    require_remote(service)?;
    let summary = service.sync_from_remote().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Sync completed: {}", format_summary(&summary));
    }
    Ok(())
}
