//! MyMovies CLI - keep a movie watch list in sync with a remote store
//!
//! Searches the movie API, saves picks locally and remotely, and pulls the
//! remote list into the local database before each command.

mod cli;
mod commands;
mod config_file;
mod error;

#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::Directive;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::{open_service, resolve_db_path, startup_sync};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::commands::search::run_search;
use crate::commands::sync::run_sync;
use crate::commands::watched::run_watched;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "mymovies=info".parse::<Directive>() {
        env_filter = env_filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help().map_err(CliError::Io)?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Config { command } => return run_config(command),
        Commands::Completions { shell, output } => {
            return run_completions(shell, output.as_deref());
        }
        _ => {}
    }

    let db_path = resolve_db_path(cli.db_path);
    let service = open_service(&db_path).await?;

    if command.wants_startup_sync() && !cli.offline {
        startup_sync(&service).await;
    }

    match command {
        Commands::Search { term, json } => run_search(&term, json, &service).await?,
        Commands::Add { title, watched } => run_add(&title, watched, &service).await?,
        Commands::List { limit, json } => run_list(limit, json, &service).await?,
        Commands::Watched { id, unset } => run_watched(&id, unset, &service).await?,
        Commands::Delete { id } => run_delete(&id, &service).await?,
        Commands::Sync { json } => run_sync(json, &service).await?,
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
