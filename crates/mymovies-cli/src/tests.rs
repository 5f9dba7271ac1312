use std::path::PathBuf;

use clap::Parser;
use mymovies_core::config::{ClientConfig, DEFAULT_SEARCH_URL};
use mymovies_core::services::DatabaseService;
use mymovies_core::{Movie, MovieId, MovieRecord};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::cli::{Cli, Commands, CompletionShell};
use crate::commands::add::run_add;
use crate::commands::common::{
    format_movie_lines, format_relative_time, format_search_lines, normalize_movie_identifier,
    normalize_search_term, normalize_title, open_service_with_config, resolve_db_path,
    resolve_movie, truncate,
};
use crate::commands::completions::render_completions;
use crate::commands::config::{format_config_lines, merge_config_init, normalize_endpoint_url};
use crate::commands::delete::run_delete;
use crate::commands::search::run_search;
use crate::commands::sync::run_sync;
use crate::config_file::CliConfig;
use crate::error::CliError;

fn fixed_id(value: &str) -> MovieId {
    value.parse().unwrap()
}

fn words(text: &str) -> Vec<String> {
    text.split(' ').map(str::to_string).collect()
}

#[test]
fn normalize_title_joins_and_trims_parts() {
    assert_eq!(
        normalize_title(&words(" The Third  Man ")).unwrap(),
        "The Third  Man"
    );
    assert!(matches!(normalize_title(&[]), Err(CliError::EmptyTitle)));
    assert!(matches!(
        normalize_title(&words("   ")),
        Err(CliError::EmptyTitle)
    ));
}

#[test]
fn normalize_search_term_rejects_blank_input() {
    assert_eq!(normalize_search_term(&words("star wars")).unwrap(), "star wars");
    assert!(matches!(
        normalize_search_term(&[" ".to_string()]),
        Err(CliError::EmptySearchTerm)
    ));
}

#[test]
fn normalize_movie_identifier_trims_and_rejects_empty() {
    assert_eq!(normalize_movie_identifier(" 0190ab ").unwrap(), "0190ab");
    assert!(matches!(
        normalize_movie_identifier("\t"),
        Err(CliError::EmptyMovieId)
    ));
}

#[test]
fn relative_time_buckets() {
    let now = 1_000_000_000_000;
    assert_eq!(format_relative_time(now - 5_000, now), "just now");
    assert_eq!(format_relative_time(now - 5 * 60_000, now), "5m ago");
    assert_eq!(format_relative_time(now - 3 * 3_600_000, now), "3h ago");
    assert_eq!(format_relative_time(now - 2 * 86_400_000, now), "2d ago");
    assert_eq!(format_relative_time(now - 400 * 86_400_000, now), "1y ago");
    assert_eq!(format_relative_time(now + 60_000, now), "just now");
}

#[test]
fn truncate_collapses_whitespace_and_shortens() {
    assert_eq!(truncate("Blade   Runner", 40), "Blade Runner");
    assert_eq!(truncate("Dr. Strangelove or How I Learned", 10), "Dr. Str...");
}

#[test]
fn movie_lines_show_short_id_and_watched_mark() {
    let watched = Movie::with_id(
        fixed_id("01900000-0000-7000-8000-000000000001"),
        "Alien",
        true,
    );
    let unwatched = Movie::with_id(
        fixed_id("01900000-0000-7000-8000-000000000002"),
        "Aliens",
        false,
    );

    let lines = format_movie_lines(&[watched, unwatched]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("01900000-0000  [x] Alien"));
    assert!(lines[1].starts_with("01900000-0000  [ ] Aliens"));
}

#[test]
fn search_lines_are_numbered_in_result_order() {
    let lines = format_search_lines(&[MovieRecord::new("Heat"), MovieRecord::new("Heathers")]);
    assert_eq!(lines, vec!["  1. Heat".to_string(), "  2. Heathers".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn resolve_movie_matches_exact_id_and_unique_prefix() {
    let db = DatabaseService::open_in_memory().await.unwrap();
    let first = Movie::with_id(
        fixed_id("11111111-1111-7111-8111-111111111111"),
        "Brazil",
        false,
    );
    let second = Movie::with_id(
        fixed_id("11111111-2222-7222-8222-222222222222"),
        "Paris, Texas",
        true,
    );
    db.save_movie(&first).await.unwrap();
    db.save_movie(&second).await.unwrap();

    let exact = resolve_movie(&first.id.to_string(), &db).await.unwrap();
    assert_eq!(exact.id, first.id);

    let by_prefix = resolve_movie("11111111-2", &db).await.unwrap();
    assert_eq!(by_prefix.id, second.id);

    assert!(matches!(
        resolve_movie("1111", &db).await,
        Err(CliError::AmbiguousMovieId(message)) if message.contains("11111111-1111")
    ));
    assert!(matches!(
        resolve_movie("ffff", &db).await,
        Err(CliError::MovieNotFound(query)) if query == "ffff"
    ));
}

#[test]
fn explicit_db_path_wins() {
    let path = PathBuf::from("/tmp/mymovies-test.db");
    assert_eq!(resolve_db_path(Some(path.clone())), path);
}

#[test]
fn endpoint_urls_require_http_scheme() {
    assert_eq!(
        normalize_endpoint_url(" https://movies.firebaseio.com/list/ ".to_string(), "store URL")
            .unwrap(),
        "https://movies.firebaseio.com/list"
    );
    assert!(matches!(
        normalize_endpoint_url("movies.firebaseio.com".to_string(), "store URL"),
        Err(CliError::Config(message)) if message.contains("store URL")
    ));
}

#[test]
fn config_init_overlays_only_explicit_values() {
    let existing = CliConfig {
        version: 1,
        store_url: Some("https://old.example.com/movies".to_string()),
        search_url: None,
        search_api_key: Some("old-key".to_string()),
    };

    let merged = merge_config_init(
        existing,
        Some("https://new.example.com/movies/".to_string()),
        None,
        Some("  ".to_string()),
    )
    .unwrap();

    assert_eq!(
        merged.store_url.as_deref(),
        Some("https://new.example.com/movies")
    );
    assert_eq!(merged.search_url, None);
    assert_eq!(merged.search_api_key.as_deref(), Some("old-key"));
}

#[test]
fn config_lines_hide_the_api_key() {
    let config = CliConfig {
        version: 1,
        store_url: None,
        search_url: None,
        search_api_key: Some("secret".to_string()),
    };

    let lines = format_config_lines(&config).join("\n");
    assert!(lines.contains("store_url:      (not set)"));
    assert!(lines.contains(DEFAULT_SEARCH_URL));
    assert!(lines.contains("search_api_key: (set)"));
    assert!(!lines.contains("secret"));
}

#[test]
fn completions_target_the_binary_name() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("mymovies"));
    assert!(!render_completions(CompletionShell::Fish).is_empty());
}

#[test]
fn global_flags_parse_after_subcommands() {
    let cli = Cli::try_parse_from(["mymovies", "list", "--limit", "5", "--offline"]).unwrap();
    assert!(cli.offline);
    assert!(matches!(
        cli.command,
        Some(Commands::List { limit: 5, json: false })
    ));
}

#[test]
fn startup_sync_skips_sync_and_setup_commands() {
    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args.iter().copied()).unwrap().command.unwrap()
    }

    assert!(parse(&["mymovies", "list"]).wants_startup_sync());
    assert!(parse(&["mymovies", "add", "Heat"]).wants_startup_sync());
    assert!(parse(&["mymovies", "save", "Heat"]).wants_startup_sync());
    assert!(!parse(&["mymovies", "sync"]).wants_startup_sync());
    assert!(!parse(&["mymovies", "config", "show"]).wants_startup_sync());
    assert!(!parse(&["mymovies", "completions", "zsh"]).wants_startup_sync());
}

#[tokio::test(flavor = "multi_thread")]
async fn remote_commands_require_a_configured_store() {
    let dir = tempdir().unwrap();
    let service = open_service_with_config(&dir.path().join("mymovies.db"), &ClientConfig::default())
        .await
        .unwrap();

    assert!(matches!(
        run_add(&words("Heat"), false, &service).await,
        Err(CliError::RemoteNotConfigured)
    ));
    assert!(matches!(
        run_sync(false, &service).await,
        Err(CliError::RemoteNotConfigured)
    ));
    assert!(matches!(
        run_delete("0190", &service).await,
        Err(CliError::RemoteNotConfigured)
    ));
    assert!(service.list(10, 0).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn search_validates_term_before_configuration() {
    let dir = tempdir().unwrap();
    let service = open_service_with_config(&dir.path().join("mymovies.db"), &ClientConfig::default())
        .await
        .unwrap();

    assert!(matches!(
        run_search(&[], false, &service).await,
        Err(CliError::EmptySearchTerm)
    ));
    assert!(matches!(
        run_search(&words("heat"), false, &service).await,
        Err(CliError::SearchNotConfigured)
    ));
}
