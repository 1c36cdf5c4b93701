use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A fixed-capacity least-recently-used cache.
///
/// Recency is tracked by insertion and access order: the front of the queue
/// is the least-recently-used entry and is evicted first. Eviction is
/// deterministic, the earliest-untouched key always goes first.
pub struct LruCache<K, V> {
    capacity: usize,
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        assert_ne!(capacity, 0, "cache capacity must be positive");
        LruCache {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Retrieve an entry and move it to the most-recently-used position.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let value = self.map.get(key)?.clone();
        self.touch(key);
        Some(value)
    }

    /// Insert or overwrite an entry at the most-recently-used position,
    /// evicting the least-recently-used entry if the cache is full.
    pub fn put(&mut self, key: K, value: V) {
        if self.map.remove(&key).is_some() {
            self.unlink(&key);
        } else if self.map.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
    }

    fn touch(&mut self, key: &K) {
        self.unlink(key);
        self.order.push_back(key.clone());
    }

    fn unlink(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = LruCache::new(3);
        for k in 1..=3 {
            cache.put(k, k * 10);
        }
        cache.put(4, 40);
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn access_refreshes_recency() {
        let mut cache = LruCache::new(3);
        for k in 1..=3 {
            cache.put(k, k * 10);
        }
        assert_eq!(cache.get(&1), Some(10));
        cache.put(4, 40);
        // 2 is now the oldest untouched key.
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn overwrite_does_not_evict() {
        let mut cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(3));
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn missing_key_is_none() {
        let mut cache: LruCache<i32, i32> = LruCache::new(2);
        assert_eq!(cache.get(&1), None);
        assert!(!cache.contains(&1));
    }
}
