//! OpenSearch error types

/// OpenSearch error types
#[derive(Debug, thiserror::Error)]
pub enum OpenSearchError {
    // Description errors
    #[error("invalid description URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("the document at '{uri}' does not appear to be XML")]
    NotXml { uri: String },

    /// The description parsed, but had no `Url` element carrying a
    /// non-empty `template` attribute (or one of its `Url` elements lacked it).
    #[error("the document at '{uri}' does not contain a 'Url' element with a 'template' attribute")]
    MissingTemplateNode { uri: String },

    #[error("no url template for requested type '{content_type}'")]
    UnknownRequestedType { content_type: String },

    #[error("no description URL supplied and no default description URL configured")]
    NoDescriptionConfigured,

    // Transport errors, surfaced as the HTTP client reports them
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    // Data errors
    #[error("feed error: {0}")]
    Feed(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl OpenSearchError {
    /// Whether this error concerns the description document or template
    /// selection, as opposed to transport or configuration.
    pub fn is_description_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUri { .. }
                | Self::NotXml { .. }
                | Self::MissingTemplateNode { .. }
                | Self::UnknownRequestedType { .. }
                | Self::NoDescriptionConfigured
        )
    }

    /// The description URI that caused the error, when known.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::InvalidUri { uri, .. }
            | Self::NotXml { uri }
            | Self::MissingTemplateNode { uri } => Some(uri),
            _ => None,
        }
    }
}

impl From<feed_rs::parser::ParseFeedError> for OpenSearchError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        OpenSearchError::Feed(err.to_string())
    }
}

/// Result type alias for OpenSearch operations
pub type Result<T> = std::result::Result<T, OpenSearchError>;
