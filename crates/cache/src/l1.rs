//! In-process L1 tier: bounded LRU behind a single mutex (spec.md §4.2, §5)
//!
//! O(1) per operation; the mutex is held only for the map access, never
//! across an await point.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

const DEFAULT_CAPACITY: usize = 5000;

struct Entry {
    payload: String,
    expires_at: Instant,
}

pub struct L1Cache {
    inner: Mutex<LruCache<String, Entry>>,
}

impl L1Cache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap());
        Self {
            inner: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let mut cache = self.inner.lock();
        match cache.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.payload.clone()),
            Some(_) => {
                cache.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: String, payload: String, ttl: Duration) {
        let mut cache = self.inner.lock();
        cache.put(
            key,
            Entry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn remove(&self, key: &str) {
        self.inner.lock().pop(key);
    }
}

impl Default for L1Cache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_put_get_roundtrip() {
        let cache = L1Cache::with_capacity(10);
        cache.put("k".into(), "v".into(), Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_expiry() {
        let cache = L1Cache::with_capacity(10);
        cache.put("k".into(), "v".into(), Duration::from_millis(10));
        sleep(Duration::from_millis(30));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_remove() {
        let cache = L1Cache::with_capacity(10);
        cache.put("k".into(), "v".into(), Duration::from_secs(60));
        cache.remove("k");
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = L1Cache::with_capacity(1);
        cache.put("a".into(), "1".into(), Duration::from_secs(60));
        cache.put("b".into(), "2".into(), Duration::from_secs(60));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("2".to_string()));
    }
}
