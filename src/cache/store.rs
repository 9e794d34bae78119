// In-memory cache store with TTL expiry.
// Entries are checked lazily on read; nothing sweeps the map in the background.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::Clock;

/// Default TTL for upstream aggregation results: one day.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached value with the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the data was stored.
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Time elapsed since the entry was stored. Clamped at zero if the clock went backwards.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// An entry exactly `ttl` old is still fresh.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}

/// Process-local key/value store whose entries expire after a fixed TTL.
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn with_default_ttl(clock: Arc<dyn Clock>) -> Self {
        Self::new(DEFAULT_TTL, clock)
    }

    /// Get a value if present and not expired. Expired entries are evicted.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let expired = entries.get(key)?.is_expired(now, self.ttl);
        if expired {
            tracing::debug!(key, "cache entry expired");
            entries.remove(key);
            return None;
        }

        entries.get(key).map(|entry| entry.data.clone())
    }

    /// Store a value, replacing any prior entry for the key.
    pub fn set(&self, key: impl Into<String>, data: T) {
        let entry = CacheEntry {
            data,
            stored_at: self.clock.now(),
        };
        self.lock().insert(key.into(), entry);
    }

    /// Remove an entry. No-op if absent.
    pub fn invalidate(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Age of an entry, expired or not. Diagnostic only.
    pub fn age(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.lock().get(key).map(|entry| entry.age(now))
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Cached data is regenerable, so a poisoned lock is not worth propagating.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn setup() -> (Arc<ManualClock>, TtlCache<String>) {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let cache = TtlCache::with_default_ttl(clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_get_after_set() {
        let (clock, cache) = setup();
        cache.set("repos", "data".to_string());

        clock.advance(chrono::Duration::hours(23));
        assert_eq!(cache.get("repos"), Some("data".to_string()));
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn test_entry_exactly_at_ttl_is_fresh() {
        let (clock, cache) = setup();
        cache.set("repos", "data".to_string());

        clock.advance(chrono::Duration::hours(24));
        assert_eq!(cache.get("repos"), Some("data".to_string()));
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let (clock, cache) = setup();
        cache.set("repos", "data".to_string());

        clock.advance(chrono::Duration::hours(24) + chrono::Duration::seconds(1));
        assert_eq!(cache.get("repos"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.age("repos"), None);
    }

    #[test]
    fn test_expired_entry_lingers_until_read() {
        let (clock, cache) = setup();
        cache.set("repos", "data".to_string());

        clock.advance(chrono::Duration::days(3));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.age("repos"), Some(Duration::from_secs(3 * 24 * 60 * 60)));
    }

    #[test]
    fn test_set_replaces_and_resets_age() {
        let (clock, cache) = setup();
        cache.set("repos", "old".to_string());

        clock.advance(chrono::Duration::hours(20));
        cache.set("repos", "new".to_string());
        assert_eq!(cache.age("repos"), Some(Duration::ZERO));

        clock.advance(chrono::Duration::hours(20));
        assert_eq!(cache.get("repos"), Some("new".to_string()));
    }

    #[test]
    fn test_invalidate() {
        let (_clock, cache) = setup();
        cache.invalidate("missing");

        cache.set("repos", "data".to_string());
        cache.invalidate("repos");
        assert_eq!(cache.get("repos"), None);
    }

    #[test]
    fn test_clear() {
        let (_clock, cache) = setup();
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_custom_ttl() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let cache = TtlCache::new(Duration::from_secs(60), clock.clone());
        cache.set("k", 7u64);

        clock.advance(chrono::Duration::seconds(61));
        assert_eq!(cache.get("k"), None);
    }
}
