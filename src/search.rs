//! Queries the hexdocs search index for a term across a set of packages.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::hex::HexClient;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Search index responded with status {0}")]
    Status(StatusCode),
}

/// Body returned by the search index. Every field is optional upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub found: Option<u64>,
    pub request_params: Option<RequestParams>,
    pub hits: Option<Vec<Hit>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestParams {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hit {
    pub document: HitDocument,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HitDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub package: String,
    #[serde(default, rename = "ref", deserialize_with = "null_as_empty")]
    pub reference: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_empty")]
    pub kind: String,
    /// Documentation body, absent for entries without prose.
    pub doc: Option<String>,
}

// A null field on one hit should not discard the whole response.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Resolves package versions and runs the filtered search.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    search_url: Url,
    timeout: Duration,
    hex: HexClient,
}

impl SearchClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            hex: HexClient::new(client.clone(), config),
            client,
            search_url: config.search_url.clone(),
            timeout: config.search_timeout,
        }
    }

    /// Builds the shared HTTP client and wires both upstream clients to it.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client, config))
    }

    /// `?q=<query>&query_by=doc,title&filter_by=package:=<id1&id2...>`
    fn search_url(&self, query: &str, identifiers: &[String]) -> Url {
        let filter = format!("package:={}", identifiers.join("&"));
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("query_by", "doc,title")
            .append_pair("filter_by", &filter);
        url
    }

    /// Searches `query` within the latest release of each package in
    /// `packages`. Packages that cannot be resolved are left out of the
    /// filter; the search is issued even when none resolve.
    pub async fn search(&self, query: &str, packages: &[String]) -> Result<SearchResponse, SearchError> {
        let identifiers = self.hex.resolve_latest_versions(packages).await;
        tracing::info!(
            requested = packages.len(),
            resolved = identifiers.len(),
            "Searching hexdocs for {:?}",
            query
        );

        let url = self.search_url(query, &identifiers);
        tracing::debug!("Search request: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}
