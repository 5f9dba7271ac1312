//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use mymovies_core::config::ClientConfig;
use mymovies_core::util::normalize_text_option;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";

pub const STORE_URL_ENV: &str = "MYMOVIES_STORE_URL";
pub const SEARCH_URL_ENV: &str = "MYMOVIES_SEARCH_URL";
pub const API_KEY_ENV: &str = "MYMOVIES_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub store_url: Option<String>,
    #[serde(default)]
    pub search_url: Option<String>,
    #[serde(default)]
    pub search_api_key: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI config directory"))
        .join("mymovies")
        .join(CONFIG_FILE_NAME)
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path();
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// File values overlaid with `MYMOVIES_*` environment variables.
    pub fn client_config(&self) -> ClientConfig {
        self.client_config_with_env(|name| std::env::var(name).ok())
    }

    pub fn client_config_with_env(&self, lookup: impl Fn(&str) -> Option<String>) -> ClientConfig {
        let from_file = ClientConfig {
            store_url: self.store_url.clone(),
            search_url: self.search_url.clone(),
            search_api_key: self.search_api_key.clone(),
        };
        from_file.merged_with(ClientConfig {
            store_url: lookup(STORE_URL_ENV),
            search_url: lookup(SEARCH_URL_ENV),
            search_api_key: lookup(API_KEY_ENV),
        })
    }

    fn normalize(&mut self) {
        self.store_url = normalize_text_option(self.store_url.take());
        self.search_url = normalize_text_option(self.search_url.take());
        self.search_api_key = normalize_text_option(self.search_api_key.take());
    }
}
