//! Time-to-live memoization for upstream results.

use parking_lot::Mutex;
use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};

/// A source of monotonic time.
pub trait Clock: Debug + Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// The [`Clock`] reading the tokio clock, which stands still while a test runtime is paused.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// A cached value along with the instant it was fetched at.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The cached value.
    pub value: V,
    /// The instant the value was fetched at.
    pub fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Returns true if the entry is younger than `ttl` at `now`.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// A keyed cache whose entries are only served while younger than the time-to-live.
///
/// Expired entries are kept so that callers can fall back to the last known value when a refetch
/// fails, see [`TtlCache::last`].
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Returns an empty cache.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl, clock }
    }

    /// Returns the value for the key if it is still fresh.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.entries
            .lock()
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Returns the last value stored for the key, regardless of its age.
    pub fn last<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().get(key).map(|entry| entry.value.clone())
    }

    /// Stores the value for the key, fetched now.
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry { value, fetched_at: self.clock.now() };
        self.entries.lock().insert(key, entry);
    }

    /// Drops all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Returns the number of entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the cache holds no entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ManualClock;

    #[test]
    fn test_entries_expire_after_ttl() {
        let clock = ManualClock::new();
        let cache = TtlCache::new(Duration::from_secs(300), Arc::new(clock.clone()));
        cache.insert("price".to_string(), 1.5);

        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get("price"), Some(1.5));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("price"), None);
        assert_eq!(cache.last("price"), Some(1.5));
    }

    #[test]
    fn test_insert_refreshes_entry() {
        let clock = ManualClock::new();
        let cache = TtlCache::new(Duration::from_secs(10), Arc::new(clock.clone()));
        cache.insert(1u32, "a");
        clock.advance(Duration::from_secs(15));
        cache.insert(1, "b");

        assert_eq!(cache.get(&1), Some("b"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.last(&1), None);
    }
}
