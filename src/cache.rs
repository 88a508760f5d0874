//! Fixed-capacity LRU cache sitting in front of the order store.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::order::Order;

/// Cache of order aggregates keyed by `order_uid`.
pub type OrderCache = LruCache<String, Arc<Order>>;

/// Thread-safe least-recently-used cache with a fixed capacity.
///
/// Both reads and writes refresh recency. Once full, adding a new key evicts
/// the entry whose last `get` or `add` is the oldest. A hit reorders the
/// map, so reads take the lock exclusively too.
pub struct LruCache<K, V> {
    inner: Mutex<lru::LruCache<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(lru::LruCache::new(capacity)),
        }
    }

    /// Returns a clone of the cached value and marks it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Inserts or replaces `key`, marking it most recently used. Returns the
    /// key that had to be evicted to make room, if any.
    pub fn add(&self, key: K, value: V) -> Option<K> {
        push(&mut self.inner.lock(), key, value)
    }

    pub fn remove(&self, key: &K) {
        self.inner.lock().pop(key);
    }

    /// Seeds the cache in iteration order under a single lock. When the input
    /// is longer than the capacity, its tail is what stays resident.
    pub fn load_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut lru = self.inner.lock();
        for (key, value) in entries {
            push(&mut lru, key, value);
        }
    }

    /// Presence check that does not touch recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().cap().get()
    }

    /// Resident keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().iter().map(|(k, _)| k.clone()).collect()
    }
}

/// `push` also hands back the old pair when `key` was already resident;
/// only a different key counts as an eviction.
fn push<K: Hash + Eq + Clone, V>(lru: &mut lru::LruCache<K, V>, key: K, value: V) -> Option<K> {
    let inserted = key.clone();
    lru.push(key, value)
        .map(|(old, _)| old)
        .filter(|old| *old != inserted)
}

impl LruCache<String, Arc<Order>> {
    pub fn load_orders<I>(&self, orders: I)
    where
        I: IntoIterator<Item = Order>,
    {
        self.load_all(
            orders
                .into_iter()
                .map(|order| (order.order_uid.clone(), Arc::new(order))),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::domain::validation::tests::valid_order;

    fn cache(capacity: usize) -> LruCache<String, u32> {
        LruCache::new(NonZeroUsize::new(capacity).expect("non-zero capacity"))
    }

    fn key(n: u32) -> String {
        format!("k{n}")
    }

    #[test]
    fn get_on_missing_key_returns_none() {
        let c = cache(2);
        assert_eq!(c.get(&key(1)), None);
        assert!(c.is_empty());
    }

    #[test]
    fn add_beyond_capacity_evicts_least_recently_added() {
        let c = cache(3);
        for n in 1..=3 {
            assert_eq!(c.add(key(n), n), None);
        }
        assert_eq!(c.add(key(4), 4), Some(key(1)));
        assert_eq!(c.keys(), vec![key(4), key(3), key(2)]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn resident_set_tracks_most_recent_distinct_keys() {
        let c = cache(4);
        let touches = [1, 2, 3, 1, 4, 5, 2, 6, 1, 7, 7, 3];
        let mut expected: Vec<u32> = Vec::new();
        for n in touches {
            c.add(key(n), n);
            expected.retain(|&e| e != n);
            expected.insert(0, n);
            expected.truncate(4);
            assert_eq!(c.keys(), expected.iter().map(|&e| key(e)).collect::<Vec<_>>());
        }
    }

    #[test]
    fn get_refreshes_recency_without_changing_size() {
        let c = cache(3);
        c.add(key(1), 1);
        c.add(key(2), 2);
        c.add(key(3), 3);

        assert_eq!(c.get(&key(1)), Some(1));
        assert_eq!(c.len(), 3);
        assert_eq!(c.keys()[0], key(1));

        assert_eq!(c.add(key(4), 4), Some(key(2)));
        assert!(c.contains(&key(1)));
    }

    #[test]
    fn re_adding_existing_key_replaces_value_without_eviction() {
        let c = cache(2);
        c.add(key(1), 1);
        c.add(key(2), 2);

        assert_eq!(c.add(key(1), 10), None);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(&key(1)), Some(10));
        assert_eq!(c.keys(), vec![key(1), key(2)]);
    }

    #[test]
    fn remove_is_a_noop_for_missing_keys() {
        let c = cache(2);
        c.add(key(1), 1);
        c.remove(&key(9));
        assert_eq!(c.len(), 1);

        c.remove(&key(1));
        assert!(c.is_empty());
        assert_eq!(c.get(&key(1)), None);
    }

    #[test]
    fn remove_frees_room_for_a_new_key() {
        let c = cache(2);
        c.add(key(1), 1);
        c.add(key(2), 2);
        c.remove(&key(1));

        assert_eq!(c.add(key(3), 3), None);
        assert_eq!(c.keys(), vec![key(3), key(2)]);
        assert_eq!(c.add(key(4), 4), Some(key(2)));
        assert_eq!(c.keys(), vec![key(4), key(3)]);
    }

    #[test]
    fn removing_middle_entry_keeps_recency_order() {
        let c = cache(3);
        c.add(key(1), 1);
        c.add(key(2), 2);
        c.add(key(3), 3);
        c.remove(&key(2));
        assert_eq!(c.keys(), vec![key(3), key(1)]);

        c.remove(&key(1));
        c.remove(&key(3));
        assert!(c.keys().is_empty());
        c.add(key(5), 5);
        assert_eq!(c.keys(), vec![key(5)]);
    }

    #[test]
    fn capacity_of_one_keeps_only_latest() {
        let c = cache(1);
        c.add(key(1), 1);
        assert_eq!(c.add(key(2), 2), Some(key(1)));
        assert_eq!(c.get(&key(2)), Some(2));
        assert_eq!(c.capacity(), 1);
    }

    #[test]
    fn load_all_keeps_the_tail_of_an_oversized_input() {
        let c = cache(3);
        c.load_all((1..=5).map(|n| (key(n), n)));
        assert_eq!(c.keys(), vec![key(5), key(4), key(3)]);
    }

    #[test]
    fn load_orders_keys_by_order_uid() {
        let c: OrderCache = LruCache::new(NonZeroUsize::new(2).expect("non-zero"));
        c.load_orders(vec![valid_order("a"), valid_order("b"), valid_order("c")]);

        assert_eq!(c.keys(), vec!["c".to_string(), "b".to_string()]);
        let b = c.get(&"b".to_string()).expect("b is resident");
        assert_eq!(b.order_uid, "b");
    }

    #[test]
    fn concurrent_access_never_exceeds_capacity() {
        let c = Arc::new(cache(16));
        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let c = Arc::clone(&c);
                thread::spawn(move || {
                    for i in 0..1_000u32 {
                        let n = t * 10_000 + i % 40;
                        c.add(key(n), n);
                        if let Some(v) = c.get(&key(n)) {
                            assert_eq!(v, n);
                        }
                        if i % 7 == 0 {
                            c.remove(&key(n));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }

        assert!(c.len() <= 16);
        assert_eq!(c.keys().len(), c.len());
    }
}
