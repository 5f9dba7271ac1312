use mymovies_core::util::{is_http_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::config_file::{default_config_path, CliConfig, API_KEY_ENV, SEARCH_URL_ENV, STORE_URL_ENV};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            store_url,
            search_url,
            api_key,
        } => run_config_init(store_url, search_url, api_key),
        ConfigCommands::Show => run_config_show(),
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn run_config_init(
    store_url: Option<String>,
    search_url: Option<String>,
    api_key: Option<String>,
) -> Result<(), CliError> {
    let existing = CliConfig::load().map_err(CliError::Config)?;
    let config = merge_config_init(existing, store_url, search_url, api_key)?;

    let path = config.save().map_err(CliError::Config)?;
    println!("Saved configuration to {}", path.display());
    for line in format_config_lines(&config) {
        println!("{line}");
    }
    Ok(())
}

pub fn run_config_show() -> Result<(), CliError> {
    let config = CliConfig::load().map_err(CliError::Config)?;
    println!("Config file: {}", default_config_path().display());
    for line in format_config_lines(&config) {
        println!("{line}");
    }

    let effective = config.client_config();
    if effective.store_url != config.store_url || effective.search_api_key != config.search_api_key
    {
        println!("Environment overrides ({STORE_URL_ENV}, {SEARCH_URL_ENV}, {API_KEY_ENV}) are active.");
    }
    Ok(())
}

/// Overlay explicit `config init` values on the stored config.
pub fn merge_config_init(
    mut config: CliConfig,
    store_url: Option<String>,
    search_url: Option<String>,
    api_key: Option<String>,
) -> Result<CliConfig, CliError> {
    if let Some(store_url) = normalize_text_option(store_url) {
        config.store_url = Some(normalize_endpoint_url(store_url, "store URL")?);
    }
    if let Some(search_url) = normalize_text_option(search_url) {
        config.search_url = Some(normalize_endpoint_url(search_url, "search URL")?);
    }
    if let Some(api_key) = normalize_text_option(api_key) {
        config.search_api_key = Some(api_key);
    }

    // Rejects store URLs the remote client cannot address.
    config.client_config_with_env(|_| None).remote_client()?;
    Ok(config)
}

pub fn normalize_endpoint_url(url: String, label: &str) -> Result<String, CliError> {
    let trimmed = url.trim().trim_end_matches('/').to_string();
    if is_http_url(&trimmed) {
        Ok(trimmed)
    } else {
        Err(CliError::Config(format!(
            "Invalid {label} '{trimmed}'. Expected an http:// or https:// URL"
        )))
    }
}

pub fn format_config_lines(config: &CliConfig) -> Vec<String> {
    let client = config.client_config_with_env(|_| None);
    vec![
        format!(
            "store_url:      {}",
            config.store_url.as_deref().unwrap_or("(not set)")
        ),
        format!("search_url:     {}", client.search_url()),
        format!(
            "search_api_key: {}",
            if config.search_api_key.is_some() {
                "(set)"
            } else {
                "(not set)"
            }
        ),
    ]
}
