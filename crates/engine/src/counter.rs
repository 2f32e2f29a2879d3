//! Insertion-ordered frequency counter.
//!
//! Renderers print "most common" tables straight from these maps, so ties
//! must resolve the same way on every run: equal counts keep the order in
//! which their keys were first seen.

use std::collections::HashMap;
use std::hash::Hash;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone)]
pub struct FrequencyMap<K> {
    entries: Vec<(K, u64)>,
    index: HashMap<K, usize>,
}

// `index` mirrors `entries`.
impl<K: PartialEq> PartialEq for FrequencyMap<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq> Eq for FrequencyMap<K> {}

impl<K> Default for FrequencyMap<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> FrequencyMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the count for `key`, returning the new count.
    pub fn increment(&mut self, key: K) -> u64 {
        self.add(key, 1)
    }

    pub fn add(&mut self, key: K, n: u64) -> u64 {
        match self.index.get(&key) {
            Some(&slot) => {
                self.entries[slot].1 += n;
                self.entries[slot].1
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, n));
                n
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(k, n)| (k, *n))
    }

    /// Up to `limit` entries, highest count first.
    pub fn most_common(&self, limit: usize) -> Vec<(&K, u64)> {
        let mut ranked: Vec<(&K, u64)> = self.iter().collect();
        // sort_by is stable: ties stay in insertion order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}

impl<K: Serialize> Serialize for FrequencyMap<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}
