//! parliament-opensearch - OpenSearch support for HTTP search APIs
//!
//! Resolves an OpenSearch description document into URL templates, caches
//! them per description URI, fills a template with search parameters, runs
//! the search and parses the Atom/RSS response.
//!
//! # Search Example
//!
//! ```rust,no_run
//! use parliament_opensearch::{SearchParameters, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> parliament_opensearch::Result<()> {
//!     let request = SearchRequest::builder()
//!         .description_url("https://api.example.com/search/description")
//!         .build()
//!         .await?;
//!
//!     let feed = request
//!         .get(&SearchParameters::new("banana").start_page(2), None, &[])
//!         .await?;
//!
//!     for entry in &feed.entries {
//!         println!("{:?} {:?}", entry.title, entry.url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Building URLs Without The Network
//!
//! ```rust
//! use parliament_opensearch::{build_query_url, SearchParameters, TemplateEntry};
//!
//! let templates = [TemplateEntry::new(
//!     "application/atom+xml",
//!     "http://x/search?q={searchTerms}&start={startPage?}",
//! )];
//! let params = SearchParameters::new("banana").start_page(10);
//! let url = build_query_url(&templates, &params, None).unwrap();
//! assert_eq!(url, "http://x/search?q=banana&start=10");
//! ```

pub mod cache;
pub mod config;
pub mod description;
pub mod error;
pub mod query;
pub mod request;
pub mod response;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{
    CacheConfig, CacheEntry, DescriptionCache, delete_description, fetch_description,
};
pub use config::ClientConfig;
pub use description::{DescriptionSource, HttpDescriptionSource, parse_description};
pub use error::{OpenSearchError, Result};
pub use query::{build_query_url, camelize};
pub use request::{SearchRequest, SearchRequestBuilder};
pub use response::parse_feed;

pub use types::{
    DEFAULT_CONTENT_TYPE, OpenSearchParameter, QueryElement, SearchEntry, SearchFeed,
    SearchParameters, TemplateEntry, TemplateSet,
};
