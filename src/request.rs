//! Search requests against an OpenSearch endpoint.
//!
//! A [`SearchRequest`] is bound to one description document. Building it
//! resolves the description through a [`DescriptionCache`]; each
//! [`get()`](SearchRequest::get) then fills a template and fetches results.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, info, warn};

use crate::cache::DescriptionCache;
use crate::config::{ClientConfig, REQUEST_ID_HEADER, insert_header};
use crate::query::build_query_url;
use crate::response::parse_feed;
use crate::telemetry;
use crate::types::{DEFAULT_CONTENT_TYPE, SearchFeed, SearchParameters, TemplateSet};
use crate::{OpenSearchError, Result};

/// Builder for [`SearchRequest`].
///
/// ```rust,no_run
/// # use parliament_opensearch::{SearchParameters, SearchRequest};
/// # async fn run() -> parliament_opensearch::Result<()> {
/// let request = SearchRequest::builder()
///     .description_url("https://api.example.com/search/description")
///     .build()
///     .await?;
/// let feed = request.get(&SearchParameters::new("banana"), None, &[]).await?;
/// println!("{:?} results", feed.total_results);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SearchRequestBuilder {
    description_url: Option<String>,
    config: Option<ClientConfig>,
    cache: Option<Arc<DescriptionCache>>,
    http: Option<reqwest::Client>,
    headers: Vec<(String, String)>,
    request_id: Option<String>,
}

impl SearchRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Description document to search against. Overrides the configured
    /// default.
    pub fn description_url(mut self, url: impl Into<String>) -> Self {
        self.description_url = Some(url.into());
        self
    }

    /// Client configuration. Default: [`ClientConfig::from_env()`].
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Cache to resolve the description through.
    /// Default: [`DescriptionCache::global()`].
    pub fn cache(mut self, cache: Arc<DescriptionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// HTTP client for search calls. Default: one built from the config.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Extra header sent with every search call.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Identifier forwarded in the `Request-Id` header of the description
    /// fetch and of every search call.
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Resolve the description and build the request.
    ///
    /// # Errors
    ///
    /// [`OpenSearchError::NoDescriptionConfigured`] when no description URL
    /// was given and the config has none; otherwise any error from fetching
    /// the description.
    pub async fn build(self) -> Result<SearchRequest> {
        let config = self.config.unwrap_or_else(ClientConfig::from_env);
        let description_url = self
            .description_url
            .or_else(|| config.description_url.clone())
            .ok_or(OpenSearchError::NoDescriptionConfigured)?;

        let mut headers = config.default_headers()?;
        for (name, value) in &self.headers {
            insert_header(&mut headers, name, value)?;
        }
        if let Some(id) = &self.request_id {
            insert_header(&mut headers, REQUEST_ID_HEADER, id)?;
        }

        let cache = match self.cache {
            Some(cache) => cache,
            None => DescriptionCache::global()?,
        };
        let templates = cache
            .fetch_with_request_id(&description_url, self.request_id.as_deref())
            .await?;

        let http = match self.http {
            Some(http) => http,
            None => config.http_client()?,
        };

        Ok(SearchRequest {
            description_url,
            templates,
            http,
            headers,
        })
    }
}

/// A search bound to one description document.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    description_url: String,
    templates: Arc<TemplateSet>,
    http: reqwest::Client,
    headers: HeaderMap,
}

impl SearchRequest {
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::new()
    }

    pub fn description_url(&self) -> &str {
        &self.description_url
    }

    /// Templates resolved from the description.
    pub fn templates(&self) -> &Arc<TemplateSet> {
        &self.templates
    }

    /// The URL a search with `params` would request, without sending it.
    pub fn query_url(&self, params: &SearchParameters, content_type: Option<&str>) -> Result<String> {
        build_query_url(&self.templates, params, content_type)
    }

    /// Run the search and parse the response feed.
    ///
    /// Custom entries in `params` and `extra_params` are appended as query
    /// parameters.
    pub async fn get(
        &self,
        params: &SearchParameters,
        content_type: Option<&str>,
        extra_params: &[(&str, &str)],
    ) -> Result<SearchFeed> {
        let body = self.get_raw(params, content_type, extra_params).await?;
        parse_feed(&body)
    }

    /// Run the search and return the response body unparsed.
    pub async fn get_raw(
        &self,
        params: &SearchParameters,
        content_type: Option<&str>,
        extra_params: &[(&str, &str)],
    ) -> Result<String> {
        let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
        let url = self.query_url(params, Some(content_type))?;

        let query: Vec<(&str, &str)> = params
            .custom()
            .chain(extra_params.iter().copied())
            .collect();

        let mut headers = self.headers.clone();
        if !headers.contains_key(ACCEPT) {
            let accept = HeaderValue::from_str(content_type).map_err(|e| {
                OpenSearchError::Configuration(format!("invalid content type {content_type:?}: {e}"))
            })?;
            headers.insert(ACCEPT, accept);
        }

        debug!(url = %url, extra = query.len(), "sending search request");
        let result = async {
            let mut request = self.http.get(&url).headers(headers);
            if !query.is_empty() {
                request = request.query(&query);
            }
            let response = request.send().await?.error_for_status()?;
            Ok::<_, OpenSearchError>(response.text().await?)
        }
        .await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::SEARCH_REQUESTS_TOTAL, "status" => status).increment(1);

        match &result {
            Ok(body) => info!(url = %url, bytes = body.len(), "search completed"),
            Err(e) => warn!(url = %url, error = %e, "search failed"),
        }
        result
    }
}
