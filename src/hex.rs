//! Latest-version lookups against the hex.pm package API.
//!
//! The docs search index is keyed by `"<package>-<version>"`, so every package
//! named in a search has to be resolved to a concrete release first.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Registry URL cannot be extended with a package name")]
    InvalidUrl,

    #[error("Registry responded with status {0}")]
    Status(StatusCode),

    #[error("Package has no published releases")]
    NoReleases,
}

#[derive(Debug, Deserialize)]
struct PackageDetails {
    #[serde(default)]
    releases: Vec<Release>,
}

#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    version: String,
}

/// Client for `GET <registry>/<package>`.
#[derive(Debug, Clone)]
pub struct HexClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
    max_concurrent: usize,
}

impl HexClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.registry_url.clone(),
            timeout: config.lookup_timeout,
            max_concurrent: config.max_concurrent_lookups.max(1),
        }
    }

    fn package_url(&self, name: &str) -> Result<Url, ResolveError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ResolveError::InvalidUrl)?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    /// Returns the version of the first release the registry lists, which
    /// hex.pm orders newest first.
    pub async fn latest_version(&self, name: &str) -> Result<String, ResolveError> {
        let url = self.package_url(name)?;
        tracing::debug!("Resolving latest version from {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolveError::Status(response.status()));
        }

        let details: PackageDetails = response.json().await?;
        details
            .releases
            .into_iter()
            .next()
            .map(|release| release.version)
            .filter(|version| !version.is_empty())
            .ok_or(ResolveError::NoReleases)
    }

    /// Resolves every name to `"<name>-<version>"`.
    ///
    /// Lookups run concurrently, at most `max_concurrent_lookups` at a time.
    /// Names that fail to resolve are logged and left out, so the result may
    /// be shorter than `names`.
    pub async fn resolve_latest_versions(&self, names: &[String]) -> Vec<String> {
        stream::iter(names.iter().cloned())
            .map(|name| async move {
                let outcome = self.latest_version(&name).await;
                (name, outcome)
            })
            .buffered(self.max_concurrent)
            .filter_map(|(name, outcome)| async move {
                match outcome {
                    Ok(version) => Some(format!("{name}-{version}")),
                    Err(err) => {
                        tracing::warn!(package = %name, "Skipping package: {}", err);
                        None
                    }
                }
            })
            .collect()
            .await
    }
}
