//! Public types for the OpenSearch API.

mod feed;
mod parameter;
mod template;

pub use feed::{QueryElement, SearchEntry, SearchFeed};
pub use parameter::{OpenSearchParameter, SearchParameters};
pub use template::{DEFAULT_CONTENT_TYPE, TemplateEntry, TemplateSet};
