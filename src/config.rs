//! Client configuration.
//!
//! Values resolve in this order:
//! 1. Builder calls / a TOML file passed to [`ClientConfig::load`]
//! 2. Environment variables, for fields still unset
//!    (see [`ClientConfig::with_env_fallback`])
//! 3. Built-in defaults
//!
//! The auth token and API version only ever end up as request headers.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::cache::{CacheConfig, DEFAULT_DESCRIPTION_TTL};
use crate::{OpenSearchError, Result};

/// Environment variable holding the default description URL.
pub const DESCRIPTION_URL_ENV: &str = "OPENSEARCH_DESCRIPTION_URL";
/// Environment variable holding the subscription key.
pub const AUTH_TOKEN_ENV: &str = "OPENSEARCH_AUTH_TOKEN";
/// Environment variable holding the API version header value.
pub const API_VERSION_ENV: &str = "PARLIAMENT_API_VERSION";

/// Header carrying the subscription key.
pub const AUTH_HEADER: &str = "Ocp-Apim-Subscription-Key";
/// Header carrying the API version.
pub const API_VERSION_HEADER: &str = "Api-Version";
/// Header carrying a caller-supplied request identifier.
pub const REQUEST_ID_HEADER: &str = "Request-Id";

/// Client configuration.
///
/// ```rust
/// # use parliament_opensearch::ClientConfig;
/// # use std::time::Duration;
/// let config = ClientConfig::new()
///     .description_url("https://example.com/description")
///     .auth_token("secret")
///     .timeout(Duration::from_secs(10));
/// assert_eq!(config.timeout_duration(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Description URL used when a request does not name one.
    #[serde(default)]
    pub description_url: Option<String>,
    /// Sent as `Ocp-Apim-Subscription-Key` when set.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Sent as `Api-Version` when set.
    #[serde(default)]
    pub api_version: Option<String>,
    /// HTTP timeout (default: 30 s). Read from `timeout_secs`, which may be
    /// fractional.
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "seconds"
    )]
    pub timeout: Duration,
    /// Description cache TTL (default: 600 s). Read from `cache_ttl_secs`.
    #[serde(
        rename = "cache_ttl_secs",
        default = "default_cache_ttl",
        deserialize_with = "seconds"
    )]
    pub cache_ttl: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_cache_ttl() -> Duration {
    DEFAULT_DESCRIPTION_TTL
}

/// Seconds as an integer or float, rejecting negative and out-of-range values.
fn seconds<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            description_url: None,
            auth_token: None,
            api_version: None,
            timeout: default_timeout(),
            cache_ttl: default_cache_ttl(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus whatever the process environment provides.
    pub fn from_env() -> Self {
        Self::default().with_env_fallback()
    }

    /// Load from a TOML file, then fill unset fields from the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            OpenSearchError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            OpenSearchError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;
        Ok(config.with_env_fallback())
    }

    /// Fill unset optional fields from the process environment.
    pub fn with_env_fallback(self) -> Self {
        self.with_fallback(|key| std::env::var(key).ok())
    }

    /// Fill unset optional fields from `lookup` (keyed by env var name).
    /// Empty values are treated as unset.
    pub fn with_fallback(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if self.description_url.is_none() {
            self.description_url = lookup(DESCRIPTION_URL_ENV);
        }
        if self.auth_token.is_none() {
            self.auth_token = lookup(AUTH_TOKEN_ENV);
        }
        if self.api_version.is_none() {
            self.api_version = lookup(API_VERSION_ENV);
        }
        self
    }

    pub fn description_url(mut self, url: impl Into<String>) -> Self {
        self.description_url = Some(url.into());
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    /// Description cache settings derived from this config.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().ttl(self.cache_ttl)
    }

    /// Headers attached to every outgoing request: auth token and API
    /// version, when configured.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.auth_token {
            insert_header(&mut headers, AUTH_HEADER, token)?;
        }
        if let Some(version) = &self.api_version {
            insert_header(&mut headers, API_VERSION_HEADER, version)?;
        }
        Ok(headers)
    }

    /// Build an HTTP client with this config's timeout.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout_duration())
            .build()?)
    }
}

/// Insert `name: value`, rejecting values that are not valid header text.
pub(crate) fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| OpenSearchError::Configuration(format!("invalid header name {name:?}: {e}")))?;
    let value = HeaderValue::from_str(value).map_err(|e| {
        OpenSearchError::Configuration(format!("invalid value for header {name}: {e}"))
    })?;
    headers.insert(name, value);
    Ok(())
}
