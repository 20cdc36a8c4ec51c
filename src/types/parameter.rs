//! Search parameter types.
//!
//! [`OpenSearchParameter`] names the optional template parameters defined by
//! the OpenSearch 1.1 URL template syntax. [`SearchParameters`] carries the
//! search terms plus any of those parameters for one search call.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::query::camelize;

/// Well-known OpenSearch parameter names with a `Custom` escape hatch.
///
/// Well-known variants take part in template substitution through their
/// `{camelCase?}` placeholder. `Custom` parameters are never substituted;
/// [`SearchRequest`](crate::SearchRequest) forwards them as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpenSearchParameter {
    Count,
    StartIndex,
    StartPage,
    Language,
    OutputEncoding,
    InputEncoding,
    /// Parameter outside the OpenSearch template set.
    Custom(String),
}

impl OpenSearchParameter {
    /// The template parameters, in substitution order.
    pub const CANONICAL: [OpenSearchParameter; 6] = [
        Self::Count,
        Self::StartIndex,
        Self::StartPage,
        Self::Language,
        Self::OutputEncoding,
        Self::InputEncoding,
    ];

    /// Snake-case key (e.g. `start_index`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Count => "count",
            Self::StartIndex => "start_index",
            Self::StartPage => "start_page",
            Self::Language => "language",
            Self::OutputEncoding => "output_encoding",
            Self::InputEncoding => "input_encoding",
            Self::Custom(s) => s.as_str(),
        }
    }

    /// Value substituted when the caller does not supply one.
    ///
    /// `None` for custom parameters, which have no placeholder.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            Self::Count => Some("10"),
            Self::StartIndex => Some("1"),
            Self::StartPage => Some("1"),
            Self::Language => Some("*"),
            Self::OutputEncoding => Some("UTF-8"),
            Self::InputEncoding => Some("UTF-8"),
            Self::Custom(_) => None,
        }
    }

    /// Optional-parameter placeholder as it appears in a template
    /// (e.g. `{startIndex?}`).
    pub fn placeholder(&self) -> String {
        format!("{{{}?}}", camelize(self.as_str()))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for OpenSearchParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpenSearchParameter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "count" => Self::Count,
            "start_index" => Self::StartIndex,
            "start_page" => Self::StartPage,
            "language" => Self::Language,
            "output_encoding" => Self::OutputEncoding,
            "input_encoding" => Self::InputEncoding,
            other => Self::Custom(other.to_string()),
        })
    }
}

/// Search terms plus optional parameters for a single search.
///
/// ```rust
/// # use parliament_opensearch::SearchParameters;
/// let params = SearchParameters::new("banana").start_page(10).count(25);
/// assert_eq!(params.query(), "banana");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParameters {
    query: String,
    values: BTreeMap<OpenSearchParameter, String>,
}

impl SearchParameters {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set any parameter by its snake-case name. Unknown names become
    /// [`OpenSearchParameter::Custom`].
    pub fn param(self, name: &str, value: impl ToString) -> Self {
        let Ok(key) = name.parse::<OpenSearchParameter>();
        self.with(key, value)
    }

    pub fn with(mut self, key: OpenSearchParameter, value: impl ToString) -> Self {
        self.values.insert(key, value.to_string());
        self
    }

    pub fn count(self, count: u32) -> Self {
        self.with(OpenSearchParameter::Count, count)
    }

    pub fn start_index(self, index: u32) -> Self {
        self.with(OpenSearchParameter::StartIndex, index)
    }

    pub fn start_page(self, page: u32) -> Self {
        self.with(OpenSearchParameter::StartPage, page)
    }

    pub fn language(self, language: impl Into<String>) -> Self {
        self.with(OpenSearchParameter::Language, language.into())
    }

    pub fn output_encoding(self, encoding: impl Into<String>) -> Self {
        self.with(OpenSearchParameter::OutputEncoding, encoding.into())
    }

    pub fn input_encoding(self, encoding: impl Into<String>) -> Self {
        self.with(OpenSearchParameter::InputEncoding, encoding.into())
    }

    /// Raw search terms.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn get(&self, key: &OpenSearchParameter) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parameters with no template placeholder, in key order.
    pub fn custom(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(k, _)| k.is_custom())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        for param in OpenSearchParameter::CANONICAL {
            let parsed: OpenSearchParameter = param.as_str().parse().unwrap();
            assert_eq!(parsed, param);
        }
    }

    #[test]
    fn unknown_name_is_custom() {
        let parsed: OpenSearchParameter = "sort".parse().unwrap();
        assert_eq!(parsed, OpenSearchParameter::Custom("sort".into()));
        assert!(parsed.default_value().is_none());
    }

    #[test]
    fn placeholders_are_camel_cased() {
        assert_eq!(OpenSearchParameter::Count.placeholder(), "{count?}");
        assert_eq!(OpenSearchParameter::StartIndex.placeholder(), "{startIndex?}");
        assert_eq!(
            OpenSearchParameter::OutputEncoding.placeholder(),
            "{outputEncoding?}"
        );
    }

    #[test]
    fn param_by_name_maps_to_known_variant() {
        let params = SearchParameters::new("q").param("start_page", "3");
        assert_eq!(params.get(&OpenSearchParameter::StartPage), Some("3"));
        assert_eq!(params.custom().count(), 0);
    }

    #[test]
    fn custom_params_are_listed() {
        let params = SearchParameters::new("q").param("sort", "date").count(5);
        let custom: Vec<_> = params.custom().collect();
        assert_eq!(custom, vec![("sort", "date")]);
    }
}
