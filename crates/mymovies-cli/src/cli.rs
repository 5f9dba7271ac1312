use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "mymovies")]
#[command(about = "Keep a movie watch list in sync with a remote store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Skip pulling remote movies before running the command
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the movie API
    Search {
        /// Search term
        term: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a movie locally and to the remote store
    #[command(alias = "save")]
    Add {
        /// Movie title
        title: Vec<String>,
        /// Mark the movie as already watched
        #[arg(long)]
        watched: bool,
    },
    /// List saved movies
    List {
        /// Number of movies to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a movie as watched (or unwatched with --unset)
    Watched {
        /// Movie ID or unique ID prefix
        id: String,
        /// Clear the watched flag instead
        #[arg(long)]
        unset: bool,
    },
    /// Delete a movie locally and from the remote store
    Delete {
        /// Movie ID or unique ID prefix
        id: String,
    },
    /// Pull every remote movie into the local store
    Sync {
        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configure remote store and search endpoints
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update the CLI config file
    Init {
        /// Remote store base URL (e.g. <https://project.firebaseio.com/movies>)
        #[arg(long, value_name = "URL")]
        store_url: Option<String>,
        /// Movie search endpoint
        #[arg(long, value_name = "URL")]
        search_url: Option<String>,
        /// Movie search API key
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
    },
    /// Print the effective configuration
    Show,
}

impl Commands {
    /// Commands that touch the movie list start with a remote pull.
    pub const fn wants_startup_sync(&self) -> bool {
        matches!(
            self,
            Self::Search { .. }
                | Self::List { .. }
                | Self::Add { .. }
                | Self::Watched { .. }
                | Self::Delete { .. }
        )
    }
}
