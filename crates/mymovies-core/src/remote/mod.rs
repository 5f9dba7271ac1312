//! Remote store client.
//!
//! Talks to a document-per-identifier JSON store (Firebase realtime database
//! layout): the whole collection lives at `<base>.json`, each movie at
//! `<base>/<identifier>.json`.

use std::collections::BTreeMap;

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::models::{MovieId, MovieRecord};
use crate::util::{compact_text, is_http_url, normalize_text_option};

/// HTTP client for the remote movie store.
#[derive(Debug, Clone)]
pub struct RemoteStoreClient {
    base_url: String,
    collection_url: String,
    client: reqwest::Client,
}

impl RemoteStoreClient {
    /// Builds a client for an explicit store base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let collection_url = collection_url(&base_url)?;
        Ok(Self {
            base_url,
            collection_url,
            client: reqwest::Client::builder().build()?,
        })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the full collection document.
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    /// URL of a single movie document.
    pub fn document_url(&self, id: &MovieId) -> String {
        format!("{}/{id}.json", self.base_url)
    }

    /// Writes the record to the document derived from its identifier.
    pub async fn put(&self, record: &MovieRecord) -> Result<()> {
        let id = record.identifier.ok_or(Error::MissingIdentifier)?;
        let body = serde_json::to_vec(record)?;

        let response = self
            .client
            .put(self.document_url(&id))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .inspect_err(|error| tracing::warn!("PUT of movie {id} failed: {error}"))?;
        ensure_success(response).await?;

        tracing::debug!("Stored movie {id} remotely");
        Ok(())
    }

    /// Deletes the document for `id`.
    ///
    /// Fails with [`Error::MissingIdentifier`] without touching the network
    /// when there is no identifier.
    pub async fn delete(&self, id: Option<&MovieId>) -> Result<()> {
        let Some(id) = id else {
            tracing::warn!("Movie to delete has no identifier");
            return Err(Error::MissingIdentifier);
        };

        let response = self
            .client
            .delete(self.document_url(id))
            .send()
            .await
            .inspect_err(|error| tracing::warn!("DELETE of movie {id} failed: {error}"))?;
        ensure_success(response).await?;

        tracing::debug!("Deleted movie {id} remotely");
        Ok(())
    }

    /// Fetches the full collection, keyed the way the store keys it.
    ///
    /// An empty store answers `null`, which yields an empty map.
    pub async fn fetch_all(&self) -> Result<BTreeMap<String, MovieRecord>> {
        let response = self
            .client
            .get(&self.collection_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .inspect_err(|error| tracing::warn!("Fetching remote movies failed: {error}"))?;
        let body = ensure_success(response).await?.text().await?;

        let records = serde_json::from_str::<Option<BTreeMap<String, MovieRecord>>>(&body)
            .inspect_err(|error| tracing::warn!("Remote movies did not decode: {error}"))?
            .unwrap_or_default();
        tracing::debug!("Fetched {} remote movie records", records.len());
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    error: Option<String>,
}

/// Pass successful responses through; turn anything else into [`Error::Http`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Http {
        status: status.as_u16(),
        message: parse_api_error(status, &body),
    })
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(StoreErrorBody {
        error: Some(message),
    }) = serde_json::from_str::<StoreErrorBody>(body)
    {
        return message.trim().to_string();
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        trimmed
    }
}

pub(crate) fn normalize_base_url(raw: String) -> Result<String> {
    let base_url = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::Config("base URL must not be empty".to_string()))?;
    if !is_http_url(&base_url) {
        return Err(Error::Config(format!(
            "base URL must include http:// or https://: {base_url}"
        )));
    }
    Url::parse(&base_url).map_err(|error| Error::Config(format!("invalid URL {base_url}: {error}")))?;
    Ok(base_url.trim_end_matches('/').to_string())
}

/// `<base>.json`, or `<base>/.json` when the base is a bare host.
fn collection_url(base_url: &str) -> Result<String> {
    let parsed =
        Url::parse(base_url).map_err(|error| Error::Config(format!("invalid URL: {error}")))?;
    if parsed.path() == "/" {
        Ok(format!("{base_url}/.json"))
    } else {
        Ok(format!("{base_url}.json"))
    }
}
