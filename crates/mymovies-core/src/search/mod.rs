//! Movie search client.
//!
//! Keyword search against a TMDB-style endpoint:
//! `GET <endpoint>?query=<term>&api_key=<key>` answering
//! `{ "results": [ ... ] }`.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::MovieRecord;
use crate::remote::{ensure_success, normalize_base_url};

/// HTTP client for the movie search API.
#[derive(Clone)]
pub struct SearchClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SearchClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<MovieRecord>,
}

impl SearchClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = normalize_base_url(endpoint.into())?;
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(Error::Config("search API key must not be empty".to_string()));
        }
        Ok(Self {
            endpoint,
            api_key,
            client: reqwest::Client::builder().build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Searches for movies matching `term`.
    ///
    /// Returns every candidate the API lists; none of them carries an
    /// identifier until it is saved.
    pub async fn search(&self, term: &str) -> Result<Vec<MovieRecord>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(Error::InvalidInput(
                "search term cannot be empty".to_string(),
            ));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", term), ("api_key", self.api_key.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .inspect_err(|error| {
                tracing::warn!("Error searching for movie with search term {term}: {error}");
            })?;
        let body = ensure_success(response).await?.text().await?;

        let payload = serde_json::from_str::<SearchResponse>(&body)
            .inspect_err(|error| tracing::warn!("Search response did not decode: {error}"))?;
        tracing::debug!("Search for {term:?} returned {} results", payload.results.len());
        Ok(payload.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_api_key() {
        assert!(matches!(
            SearchClient::new("https://api.themoviedb.org/3/search/movie", "  "),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn debug_redacts_api_key() {
        let client =
            SearchClient::new("https://api.themoviedb.org/3/search/movie", "secret-key").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn blank_term_is_rejected_before_any_request() {
        let client = SearchClient::new("http://127.0.0.1:9/search", "key").unwrap();
        assert!(matches!(
            client.search(" \t").await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn search_response_decodes_results_envelope() {
        let payload: SearchResponse = serde_json::from_str(
            r#"{"page": 1, "results": [{"id": 1, "title": "Alien"}, {"id": 2, "title": "Aliens"}]}"#,
        )
        .unwrap();
        let titles = payload
            .results
            .iter()
            .map(|record| record.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Alien", "Aliens"]);
    }
}
