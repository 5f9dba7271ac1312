//! Client configuration.
//!
//! Provides a `ClientConfig` struct used by the CLI to discover the remote
//! store and the search API, and to build their clients.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::remote::RemoteStoreClient;
use crate::search::SearchClient;
use crate::util::normalize_text_option;

/// Search endpoint used when none is configured.
pub const DEFAULT_SEARCH_URL: &str = "https://api.themoviedb.org/3/search/movie";

/// Endpoints and the search API key.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Remote store base URL, e.g. `https://<project>.firebaseio.com/movies`
    #[serde(default)]
    pub store_url: Option<String>,
    /// Search endpoint; falls back to [`DEFAULT_SEARCH_URL`]
    #[serde(default)]
    pub search_url: Option<String>,
    #[serde(default)]
    pub search_api_key: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("store_url", &self.store_url)
            .field("search_url", &self.search_url)
            .field(
                "search_api_key",
                &self.search_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Trim every field and drop empty ones.
    pub fn normalize(&mut self) {
        self.store_url = normalize_text_option(self.store_url.take());
        self.search_url = normalize_text_option(self.search_url.take());
        self.search_api_key = normalize_text_option(self.search_api_key.take());
    }

    /// Fields set in `overrides` win over this config's.
    #[must_use]
    pub fn merged_with(mut self, overrides: Self) -> Self {
        if let Some(store_url) = normalize_text_option(overrides.store_url) {
            self.store_url = Some(store_url);
        }
        if let Some(search_url) = normalize_text_option(overrides.search_url) {
            self.search_url = Some(search_url);
        }
        if let Some(api_key) = normalize_text_option(overrides.search_api_key) {
            self.search_api_key = Some(api_key);
        }
        self.normalize();
        self
    }

    /// Effective search endpoint.
    pub fn search_url(&self) -> String {
        normalize_text_option(self.search_url.clone())
            .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string())
    }

    /// Remote store client, or `None` when no store URL is configured.
    pub fn remote_client(&self) -> Result<Option<RemoteStoreClient>> {
        normalize_text_option(self.store_url.clone())
            .map(RemoteStoreClient::new)
            .transpose()
    }

    /// Search client, or `None` when no API key is configured.
    pub fn search_client(&self) -> Result<Option<SearchClient>> {
        normalize_text_option(self.search_api_key.clone())
            .map(|api_key| SearchClient::new(self.search_url(), api_key))
            .transpose()
    }
}
