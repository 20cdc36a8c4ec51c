//! Query URL construction from description templates.
//!
//! Selects the template advertised for a content type and fills in its
//! placeholders. Values are inserted as given; percent-encoding is left to
//! the HTTP client.

use crate::types::{DEFAULT_CONTENT_TYPE, OpenSearchParameter, SearchParameters, TemplateEntry};
use crate::{OpenSearchError, Result};

/// Placeholder for the search terms.
const SEARCH_TERMS: &str = "{searchTerms}";

/// Build a query URL from `templates` for `content_type`
/// (default: `application/atom+xml`).
///
/// The first template whose type matches exactly is used. `{searchTerms}` is
/// replaced with the raw query; each optional OpenSearch placeholder gets the
/// caller's value or its default.
///
/// ```rust
/// # use parliament_opensearch::{build_query_url, SearchParameters, TemplateEntry};
/// let templates = [TemplateEntry::new(
///     "application/atom+xml",
///     "http://x/search?q={searchTerms}&start={startPage?}",
/// )];
/// let url = build_query_url(&templates, &SearchParameters::new("banana"), None).unwrap();
/// assert_eq!(url, "http://x/search?q=banana&start=1");
/// ```
pub fn build_query_url(
    templates: &[TemplateEntry],
    params: &SearchParameters,
    content_type: Option<&str>,
) -> Result<String> {
    let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);

    let entry = templates
        .iter()
        .find(|entry| entry.content_type() == content_type)
        .ok_or_else(|| OpenSearchError::UnknownRequestedType {
            content_type: content_type.to_string(),
        })?;

    Ok(substitute(entry.template(), params))
}

/// Fill every known placeholder in `template`.
pub fn substitute(template: &str, params: &SearchParameters) -> String {
    let mut url = template.replace(SEARCH_TERMS, params.query());

    for param in OpenSearchParameter::CANONICAL {
        let value = params
            .get(&param)
            .or_else(|| param.default_value())
            .unwrap_or_default();
        url = url.replace(&param.placeholder(), value);
    }

    url
}

/// Convert a snake-case name to lower camel case (`start_index` → `startIndex`).
///
/// Leading underscores are dropped and repeated underscores collapse, so
/// `__start__page` also yields `startPage`.
pub fn camelize(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;

    for c in snake.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}
