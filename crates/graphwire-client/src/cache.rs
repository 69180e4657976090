//! Id-keyed resource cache with explicit invalidation

use dashmap::DashMap;
use tracing::debug;

/// Last fetched value per resource id.
///
/// No TTL and no size bound: entries leave only through [`evict`](Self::evict),
/// [`evict_where`](Self::evict_where) or [`clear`](Self::clear). Concurrent
/// fetches for the same id are not deduplicated; the last `set` wins.
pub struct ResourceCache<V> {
    name: &'static str,
    entries: DashMap<String, V>,
}

impl<V: Clone> ResourceCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: DashMap::new(),
        }
    }

    /// A copy of the cached value.
    pub fn get(&self, id: &str) -> Option<V> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    pub fn set(&self, id: impl Into<String>, value: V) {
        self.entries.insert(id.into(), value);
    }

    /// Returns whether an entry was removed.
    pub fn evict(&self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            debug!("{} cache: evicted {}", self.name, id);
        }
        removed
    }

    /// Evict every entry matching `predicate`; returns the evicted ids.
    pub fn evict_where(&self, predicate: impl Fn(&str, &V) -> bool) -> Vec<String> {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| predicate(entry.key(), entry.value()))
            .map(|entry| entry.key().clone())
            .collect();
        doomed.into_iter().filter(|id| self.evict(id)).collect()
    }

    pub fn clear(&self) {
        debug!("{} cache: cleared {} entries", self.name, self.entries.len());
        self.entries.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<V> std::fmt::Debug for ResourceCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .finish()
    }
}
