use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_REGISTRY_URL: &str = "https://hex.pm/api/packages";
pub const DEFAULT_SEARCH_URL: &str = "https://search.hexdocs.pm";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {name} URL '{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} URL cannot be used as a base URL")]
    NotABase(&'static str),

    #[error("max concurrent lookups must be at least 1")]
    ZeroConcurrency,

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Runtime settings shared by every tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base of the hex.pm package API, `<registry_url>/<package>`.
    pub registry_url: Url,
    /// Hexdocs search index endpoint.
    pub search_url: Url,
    /// Upper bound for a single registry lookup.
    pub lookup_timeout: Duration,
    /// Upper bound for the search index request.
    pub search_timeout: Duration,
    /// Registry lookups allowed in flight at once for one tool call.
    pub max_concurrent_lookups: usize,
}

impl Config {
    pub fn new(registry_url: &str, search_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            registry_url: parse_base("registry", registry_url)?,
            search_url: parse_base("search", search_url)?,
            ..Self::default()
        })
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("lookup"));
        }
        self.lookup_timeout = timeout;
        Ok(self)
    }

    pub fn with_search_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("search"));
        }
        self.search_timeout = timeout;
        Ok(self)
    }

    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        self.max_concurrent_lookups = limit;
        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: Url::parse(DEFAULT_REGISTRY_URL).expect("default registry URL is valid"),
            search_url: Url::parse(DEFAULT_SEARCH_URL).expect("default search URL is valid"),
            lookup_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(15),
            max_concurrent_lookups: 16,
        }
    }
}

fn parse_base(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::NotABase(name));
    }
    Ok(url)
}
