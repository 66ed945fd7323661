//! Injectable key/value caches.
//!
//! The embedding provider and the RSS tool both memoise remote responses. They
//! depend on the [`Cache`] trait rather than a process-wide map so callers can
//! choose between an unbounded map, a size-bounded map or a TTL-aware map, and
//! tests can inspect cache state directly.

use dashmap::DashMap;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait Cache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn set(&self, key: K, value: V);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory cache; entries live as long as the cache
#[derive(Debug)]
pub struct MemoryCache<K: Eq + Hash, V> {
    entries: DashMap<K, V>,
}

impl<K: Eq + Hash, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> MemoryCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cache holding at most `capacity` entries, evicting the oldest insert first
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    capacity: usize,
    inner: Mutex<BoundedInner<K, V>>,
}

#[derive(Debug)]
struct BoundedInner<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(BoundedInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> Cache<K, V> for BoundedCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.get(key).cloned()
    }

    fn set(&self, key: K, value: V) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.entries.insert(key.clone(), value).is_none() {
            inner.order.push_back(key);
        }
        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }
}

/// Cache whose entries expire a fixed duration after they were stored
#[derive(Debug)]
pub struct TtlCache<K: Eq + Hash, V> {
    ttl: Duration,
    entries: DashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, (stored, _)| stored.elapsed() < ttl);
    }
}

impl<K, V> Cache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        let (fresh, value) = {
            let entry = self.entries.get(key)?;
            let (stored, value) = entry.value();
            (stored.elapsed() < self.ttl, value.clone())
        };

        if fresh {
            Some(value)
        } else {
            self.entries.remove(key);
            None
        }
    }

    fn set(&self, key: K, value: V) {
        self.entries.insert(key, (Instant::now(), value));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cache_returns_stored_value() {
        let cache: MemoryCache<String, Vec<f32>> = MemoryCache::new();
        assert!(cache.is_empty());

        cache.set("key".to_string(), vec![0.1, 0.2]);
        assert_eq!(cache.get(&"key".to_string()), Some(vec![0.1, 0.2]));
        assert_eq!(cache.get(&"other".to_string()), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bounded_cache_evicts_oldest() {
        let cache: BoundedCache<u32, &str> = BoundedCache::new(2);
        cache.set(1, "one");
        cache.set(2, "two");
        cache.set(3, "three");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("two"));
        assert_eq!(cache.get(&3), Some("three"));
    }

    #[test]
    fn test_bounded_cache_overwrite_keeps_position() {
        let cache: BoundedCache<u32, &str> = BoundedCache::new(2);
        cache.set(1, "one");
        cache.set(2, "two");
        cache.set(1, "uno");
        cache.set(3, "three");

        // 1 was inserted first, so it is still the first evicted
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("two"));
    }

    #[test]
    fn test_bounded_cache_zero_capacity_holds_one() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.set(1, 1);
        cache.set(2, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(2));
    }

    #[test]
    fn test_ttl_cache_fresh_entries() {
        let cache: TtlCache<String, String> = TtlCache::new(Duration::from_secs(3600));
        cache.set("feed".to_string(), "body".to_string());
        assert_eq!(cache.get(&"feed".to_string()), Some("body".to_string()));
    }

    #[test]
    fn test_ttl_cache_expired_entries() {
        let cache: TtlCache<String, String> = TtlCache::new(Duration::ZERO);
        cache.set("feed".to_string(), "body".to_string());
        assert_eq!(cache.get(&"feed".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_ttl_cache_purge() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::ZERO);
        cache.set(1, 1);
        cache.set(2, 2);
        cache.purge_expired();
        assert_eq!(cache.len(), 0);
    }
}
