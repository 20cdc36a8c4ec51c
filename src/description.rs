//! Description document fetching and parsing.
//!
//! [`DescriptionSource`] is the seam between the
//! [`DescriptionCache`](crate::DescriptionCache) and the network.
//! [`HttpDescriptionSource`] is the production implementation: it validates
//! the URI, GETs the document, and hands the body to [`parse_description`].

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use reqwest::header::{ACCEPT, HeaderMap};
use tracing::{debug, warn};

use crate::config::{ClientConfig, REQUEST_ID_HEADER, insert_header};
use crate::telemetry;
use crate::types::{TemplateEntry, TemplateSet};
use crate::{OpenSearchError, Result};

/// Media type requested from description endpoints.
pub const DESCRIPTION_CONTENT_TYPE: &str = "application/opensearchdescription+xml";

/// Something that can turn a description URI into templates.
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    /// Fetch and parse the description at `uri`.
    ///
    /// `request_id`, when given, tags the outgoing request for tracing.
    async fn fetch_templates(&self, uri: &str, request_id: Option<&str>) -> Result<TemplateSet>;
}

/// Fetches description documents over HTTP.
#[derive(Clone)]
pub struct HttpDescriptionSource {
    http: reqwest::Client,
    headers: HeaderMap,
}

impl HttpDescriptionSource {
    /// Build a source with its own client, using `config` for the timeout
    /// and the auth/version headers.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_client(config.http_client()?, config)
    }

    /// Build a source around an existing client.
    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http,
            headers: config.default_headers()?,
        })
    }
}

#[async_trait]
impl DescriptionSource for HttpDescriptionSource {
    async fn fetch_templates(&self, uri: &str, request_id: Option<&str>) -> Result<TemplateSet> {
        let url = url::Url::parse(uri).map_err(|source| OpenSearchError::InvalidUri {
            uri: uri.to_string(),
            source,
        })?;

        let mut headers = self.headers.clone();
        if let Some(id) = request_id {
            insert_header(&mut headers, REQUEST_ID_HEADER, id)?;
        }

        debug!(uri, "fetching description document");
        let result = async {
            let body = self
                .http
                .get(url)
                .headers(headers)
                .header(ACCEPT, DESCRIPTION_CONTENT_TYPE)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            parse_description(uri, &body)
        }
        .await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::DESCRIPTION_FETCHES_TOTAL, "status" => status).increment(1);

        match &result {
            Ok(templates) => debug!(uri, templates = templates.len(), "parsed description"),
            Err(e) => warn!(uri, error = %e, "description fetch failed"),
        }
        result
    }
}

/// Parse a description document body into its URL templates.
///
/// Reads the `type` and `template` attributes of every `Url` element directly
/// under the root, in document order.
///
/// # Errors
///
/// - [`OpenSearchError::NotXml`] if the body is not well-formed XML, has no
///   root element or has more than one, or has text outside the root.
/// - [`OpenSearchError::MissingTemplateNode`] if there are no `Url` elements,
///   or any of them lacks a non-empty `template`.
pub fn parse_description(uri: &str, body: &str) -> Result<TemplateSet> {
    let not_xml = || OpenSearchError::NotXml {
        uri: uri.to_string(),
    };
    let missing = || OpenSearchError::MissingTemplateNode {
        uri: uri.to_string(),
    };

    let mut reader = Reader::from_str(body);
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut entries = Vec::new();
    let mut incomplete = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    if saw_root {
                        return Err(not_xml());
                    }
                    saw_root = true;
                } else if depth == 1 && is_url_element(&e) {
                    read_url_element(&e, &mut entries, &mut incomplete).map_err(|_| not_xml())?;
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 {
                    if saw_root {
                        return Err(not_xml());
                    }
                    saw_root = true;
                } else if depth == 1 && is_url_element(&e) {
                    read_url_element(&e, &mut entries, &mut incomplete).map_err(|_| not_xml())?;
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            // Only whitespace may sit outside the root element.
            Ok(Event::Text(t)) if depth == 0 && !t.iter().all(u8::is_ascii_whitespace) => {
                return Err(not_xml());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => return Err(not_xml()),
        }
    }

    if !saw_root || depth != 0 {
        return Err(not_xml());
    }
    if incomplete {
        return Err(missing());
    }
    TemplateSet::new(entries).ok_or_else(missing)
}

fn is_url_element(e: &BytesStart<'_>) -> bool {
    e.local_name().as_ref() == b"Url"
}

/// Collect one `Url` element. A missing or empty `template` marks the
/// document incomplete rather than failing immediately, so that a later
/// syntax error still reports as [`OpenSearchError::NotXml`].
fn read_url_element(
    e: &BytesStart<'_>,
    entries: &mut Vec<TemplateEntry>,
    incomplete: &mut bool,
) -> std::result::Result<(), quick_xml::Error> {
    let content_type = attribute(e, "type")?.unwrap_or_default();
    match attribute(e, "template")? {
        Some(template) if !template.is_empty() => {
            entries.push(TemplateEntry::new(content_type, template))
        }
        _ => *incomplete = true,
    }
    Ok(())
}

fn attribute(e: &BytesStart<'_>, name: &str) -> std::result::Result<Option<String>, quick_xml::Error> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}
