//! Parsed search response types.

use serde::{Deserialize, Serialize};

/// A search result feed.
///
/// Built by [`parse_feed`](crate::response::parse_feed) from an Atom or RSS
/// body. The OpenSearch response elements are kept as the raw text the
/// server sent; numeric parsing is left to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub entries: Vec<SearchEntry>,
    /// `opensearch:totalResults`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<String>,
    /// `opensearch:startIndex`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<String>,
    /// `opensearch:itemsPerPage`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<String>,
    /// First `opensearch:Query` element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryElement>,
}

/// A single result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// First link href.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// `title` attribute of the entry's first `link`, used by some search
    /// services to carry a display form of the URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_url: Option<String>,
    /// Text of `hint` elements attached to the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    /// Text of the entry's `Name` element, naming the kind of hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_type: Option<String>,
}

/// The `opensearch:Query` element echoed back in a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_terms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_page: Option<String>,
}

impl SearchFeed {
    /// `total_results` parsed as a number, when present and numeric.
    pub fn total_results_count(&self) -> Option<u64> {
        self.total_results.as_deref()?.trim().parse().ok()
    }
}
