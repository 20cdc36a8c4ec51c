//! Description document cache.
//!
//! [`DescriptionCache`] maps a description URI to the templates parsed from
//! it, so a search does not re-fetch the description on every call.
//!
//! # Expiry
//!
//! Entries live for [`CacheConfig::ttl`] (default: 10 minutes). Expiry is
//! lazy: a stale entry stays in the map, and is counted by
//! [`len()`](DescriptionCache::len), until the next
//! [`fetch()`](DescriptionCache::fetch) for that URI replaces it. There is no
//! background sweep, no size bound and no LRU eviction; entries leave only
//! through [`delete()`](DescriptionCache::delete) or
//! [`clear()`](DescriptionCache::clear).
//!
//! # Concurrency
//!
//! The map sits behind an `RwLock` that is never held across the network
//! fetch. Concurrent misses for the same URI each fetch independently and the
//! last write wins; a failed fetch leaves the map untouched.
//!
//! # Keys
//!
//! The key is the exact URI string. `http://x/d` and `http://x/d/` are
//! different entries.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::config::ClientConfig;
use crate::description::{DescriptionSource, HttpDescriptionSource};
use crate::telemetry;
use crate::types::TemplateSet;
use crate::Result;

/// Default time-to-live for a cached description: 10 minutes.
pub const DEFAULT_DESCRIPTION_TTL: Duration = Duration::from_secs(600);

/// Configuration for the description cache.
///
/// ```rust
/// # use parliament_opensearch::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(60));
/// assert_eq!(config.ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a fetched description stays valid. Default: 600 seconds.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_DESCRIPTION_TTL,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached descriptions.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A cached description.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    uri: String,
    fetched_at: Instant,
    templates: Arc<TemplateSet>,
}

impl CacheEntry {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// When the templates were fetched.
    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    pub fn templates(&self) -> &Arc<TemplateSet> {
        &self.templates
    }

    /// Valid through `fetched_at + ttl` inclusive.
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) <= ttl
    }
}

/// TTL cache of parsed description documents, keyed by URI.
///
/// Create one per process (or per test) and share it through an `Arc`, or
/// use [`DescriptionCache::global()`].
pub struct DescriptionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    source: Arc<dyn DescriptionSource>,
}

static GLOBAL: OnceLock<Arc<DescriptionCache>> = OnceLock::new();

impl DescriptionCache {
    /// Create an empty cache backed by `source`.
    pub fn new(source: Arc<dyn DescriptionSource>, config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: config.ttl,
            source,
        }
    }

    /// Create an empty cache that fetches over HTTP with `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let source = HttpDescriptionSource::new(config)?;
        Ok(Self::new(Arc::new(source), &config.cache_config()))
    }

    /// The process-wide cache, created on first use from
    /// [`ClientConfig::from_env()`].
    pub fn global() -> Result<Arc<DescriptionCache>> {
        if let Some(cache) = GLOBAL.get() {
            return Ok(Arc::clone(cache));
        }
        let cache = Arc::new(Self::from_config(&ClientConfig::from_env())?);
        // A racing initialiser may have won; use whichever instance landed.
        Ok(Arc::clone(GLOBAL.get_or_init(|| cache)))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Templates for `uri`, from the cache when fresh, otherwise fetched
    /// from the source and stored.
    pub async fn fetch(&self, uri: &str) -> Result<Arc<TemplateSet>> {
        self.fetch_with_request_id(uri, None).await
    }

    /// Like [`fetch()`](Self::fetch), tagging a network fetch with
    /// `request_id`.
    pub async fn fetch_with_request_id(
        &self,
        uri: &str,
        request_id: Option<&str>,
    ) -> Result<Arc<TemplateSet>> {
        let reason = match self.lookup(uri) {
            Lookup::Fresh(templates) => {
                metrics::counter!(telemetry::DESCRIPTION_CACHE_HITS_TOTAL).increment(1);
                debug!(uri, "description cache hit");
                return Ok(templates);
            }
            Lookup::Expired => "expired",
            Lookup::Missing => "missing",
        };
        metrics::counter!(telemetry::DESCRIPTION_CACHE_MISSES_TOTAL, "reason" => reason)
            .increment(1);
        debug!(uri, reason, "description cache miss");

        let templates = Arc::new(self.source.fetch_templates(uri, request_id).await?);

        let entry = CacheEntry {
            uri: uri.to_string(),
            fetched_at: Instant::now(),
            templates: Arc::clone(&templates),
        };
        self.write().insert(uri.to_string(), entry);

        Ok(templates)
    }

    /// Remove the entry for `uri`, returning it if there was one.
    pub fn delete(&self, uri: &str) -> Option<CacheEntry> {
        let removed = self.write().remove(uri);
        if removed.is_some() {
            debug!(uri, "description evicted");
        }
        removed
    }

    /// Whether an entry (fresh or stale) is stored for `uri`.
    pub fn contains(&self, uri: &str) -> bool {
        self.read().contains_key(uri)
    }

    /// Number of stored entries, including stale ones not yet replaced.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn lookup(&self, uri: &str) -> Lookup {
        match self.read().get(uri) {
            Some(entry) if entry.is_fresh(Instant::now(), self.ttl) => {
                Lookup::Fresh(Arc::clone(&entry.templates))
            }
            Some(_) => Lookup::Expired,
            None => Lookup::Missing,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Templates for `uri` through the process-wide cache.
pub async fn fetch_description(uri: &str) -> Result<Arc<TemplateSet>> {
    DescriptionCache::global()?.fetch(uri).await
}

/// Drop `uri` from the process-wide cache. Returns whether it was present.
pub fn delete_description(uri: &str) -> bool {
    GLOBAL
        .get()
        .is_some_and(|cache| cache.delete(uri).is_some())
}

enum Lookup {
    Fresh(Arc<TemplateSet>),
    Expired,
    Missing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TemplateEntry;

    #[test]
    fn entry_fresh_through_ttl_inclusive() {
        let now = Instant::now();
        let entry = CacheEntry {
            uri: "u".into(),
            fetched_at: now,
            templates: Arc::new(
                TemplateSet::new(vec![TemplateEntry::new("a", "t")]).unwrap(),
            ),
        };
        let ttl = Duration::from_secs(600);
        assert!(entry.is_fresh(now, ttl));
        assert!(entry.is_fresh(now + ttl, ttl));
        assert!(!entry.is_fresh(now + ttl + Duration::from_millis(1), ttl));
    }

    #[test]
    fn entry_fresh_with_unbounded_ttl() {
        let now = Instant::now();
        let entry = CacheEntry {
            uri: "u".into(),
            fetched_at: now,
            templates: Arc::new(
                TemplateSet::new(vec![TemplateEntry::new("a", "t")]).unwrap(),
            ),
        };
        assert!(entry.is_fresh(now + Duration::from_secs(3600), Duration::MAX));
    }

    #[test]
    fn default_ttl_is_ten_minutes() {
        assert_eq!(CacheConfig::default().ttl, Duration::from_secs(600));
    }
}
