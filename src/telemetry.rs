//! Telemetry metric name constants.
//!
//! Centralised metric names for OpenSearch operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `opensearch_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `status`: outcome: "ok" or "error"
//! - `reason`: why a cache lookup missed: "missing" or "expired"

/// Description lookups served from the cache.
pub const DESCRIPTION_CACHE_HITS_TOTAL: &str = "opensearch_description_cache_hits_total";

/// Description lookups that had to fetch.
///
/// Labels: `reason` ("missing" | "expired").
pub const DESCRIPTION_CACHE_MISSES_TOTAL: &str = "opensearch_description_cache_misses_total";

/// Description documents fetched over HTTP.
///
/// Labels: `status` ("ok" | "error").
pub const DESCRIPTION_FETCHES_TOTAL: &str = "opensearch_description_fetches_total";

/// Search requests sent.
///
/// Labels: `status` ("ok" | "error").
pub const SEARCH_REQUESTS_TOTAL: &str = "opensearch_search_requests_total";
