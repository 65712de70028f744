//! In-memory TTL cache for remote resources, keyed by locator.

use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

/// Stand-in expiry for TTLs too large to represent.
const FOREVER: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub bytes: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped for expiry or capacity
    pub evictions: u64,
}

#[derive(Debug, Clone)]
struct CachedResource {
    data: Bytes,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<Url, CachedResource>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Locator -> (bytes, expiry) store shared by the loaders of one app.
#[derive(Debug)]
pub struct StreamCache {
    inner: Mutex<Inner>,
    max_entries: usize,
}

impl Default for StreamCache {
    fn default() -> Self {
        Self::new(256)
    }
}

impl StreamCache {
    /// Create a cache holding at most `max_entries` resources.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries: max_entries.max(1),
        }
    }

    /// Fresh bytes for `locator`, if any. Expired entries are dropped.
    pub fn get(&self, locator: &Url) -> Option<Bytes> {
        let mut inner = self.inner.lock();
        let now = Instant::now();

        let found = inner
            .entries
            .get(locator)
            .map(|entry| (entry.expires_at > now, entry.data.clone()));

        match found {
            Some((true, data)) => {
                inner.hits += 1;
                Some(data)
            }
            Some((false, _)) => {
                inner.entries.remove(locator);
                inner.evictions += 1;
                inner.misses += 1;
                debug!(%locator, "cached resource expired");
                None
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store `data` for `locator`, valid for `ttl`.
    pub fn insert(&self, locator: Url, data: Bytes, ttl: Duration) {
        let mut inner = self.inner.lock();
        let now = Instant::now();

        if !inner.entries.contains_key(&locator) && inner.entries.len() >= self.max_entries {
            Self::purge_expired_locked(&mut inner, now);
            if inner.entries.len() >= self.max_entries {
                // Evict whatever would expire first
                let victim = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(key, _)| key.clone());
                if let Some(victim) = victim {
                    inner.entries.remove(&victim);
                    inner.evictions += 1;
                    debug!(locator = %victim, "evicted cached resource");
                }
            }
        }

        let expires_at = now.checked_add(ttl).unwrap_or_else(|| now + FOREVER);
        inner.entries.insert(locator, CachedResource { data, expires_at });
    }

    pub fn remove(&self, locator: &Url) -> Option<Bytes> {
        self.inner.lock().entries.remove(locator).map(|entry| entry.data)
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        Self::purge_expired_locked(&mut inner, Instant::now())
    }

    fn purge_expired_locked(inner: &mut Inner, now: Instant) -> usize {
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before - inner.entries.len();
        inner.evictions += removed as u64;
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.entries.len(),
            bytes: inner.entries.values().map(|entry| entry.data.len()).sum(),
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://example.com/").unwrap().join(path).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_hit_and_miss() {
        let cache = StreamCache::new(4);
        assert!(cache.get(&url("a.png")).is_none());

        cache.insert(url("a.png"), Bytes::from_static(b"png"), Duration::from_secs(60));
        assert_eq!(cache.get(&url("a.png")).unwrap(), Bytes::from_static(b"png"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.bytes, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = StreamCache::new(4);
        cache.insert(url("a.png"), Bytes::from_static(b"a"), Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(cache.get(&url("a.png")).is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(&url("a.png")).is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_soonest_expiry() {
        let cache = StreamCache::new(2);
        cache.insert(url("short.png"), Bytes::from_static(b"s"), Duration::from_secs(5));
        cache.insert(url("long.png"), Bytes::from_static(b"l"), Duration::from_secs(500));
        cache.insert(url("new.png"), Bytes::from_static(b"n"), Duration::from_secs(50));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&url("short.png")).is_none());
        assert!(cache.get(&url("long.png")).is_some());
        assert!(cache.get(&url("new.png")).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_never_expires() {
        let cache = StreamCache::new(4);
        cache.insert(url("a.png"), Bytes::from_static(b"a"), Duration::MAX);
        cache.insert(url("b.png"), Bytes::from_static(b"b"), Duration::from_secs(u64::MAX));

        tokio::time::advance(Duration::from_secs(10 * 365 * 24 * 60 * 60)).await;
        assert!(cache.get(&url("a.png")).is_some());
        assert!(cache.get(&url("b.png")).is_some());
        assert_eq!(cache.purge_expired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = StreamCache::new(8);
        cache.insert(url("a.png"), Bytes::from_static(b"a"), Duration::from_secs(1));
        cache.insert(url("b.png"), Bytes::from_static(b"b"), Duration::from_secs(100));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);

        assert!(cache.remove(&url("b.png")).is_some());
        assert!(cache.is_empty());
    }
}
