//! Keyed get-or-create registry
//!
//! Lookups take the shared read lock. Only the first use of a key takes the
//! write lock, and it re-checks for a concurrent winner before installing,
//! so exactly one value is ever created per key. Entries are never removed.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

pub struct Registry<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash + Copy, V: Clone> Registry<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the value for `key`, creating it with `make` on first use.
    ///
    /// `make` runs at most once per key, under the write lock.
    pub fn get_or_create(&self, key: K, make: impl FnOnce() -> V) -> V {
        if let Some(value) = self.entries.read().get(&key) {
            return value.clone();
        }

        let mut entries = self.entries.write();
        entries.entry(key).or_insert_with(make).clone()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    /// Snapshot of every value, in no particular order.
    pub fn values(&self) -> Vec<V> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K: Eq + Hash + Copy, V: Clone> Default for Registry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
