//! Collection types shared by the lexer and parser.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Several values per key, each key's values kept in insertion order.
///
/// Backs the per-line node registry, where one line may hold many nodes
/// and a multi-line node appears under every line it spans.
#[derive(Debug, Clone)]
pub struct MultiMap<K, V> {
    map: FxHashMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> MultiMap<K, V> {
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.map.entry(key).or_default().push(value);
    }

    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.map.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.map.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl<K: Eq + Hash, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_grouped_by_key() {
        let mut map = MultiMap::new();
        map.insert(3u32, "a");
        map.insert(1, "b");
        map.insert(3, "c");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&3), Some(&["a", "c"][..]));
        assert!(map.get(&2).is_none());
        assert_eq!(map.iter().map(|(_, values)| values.len()).sum::<usize>(), 3);
    }
}
