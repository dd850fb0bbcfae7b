//! # Separate Chaining Hash Table
//!
//! Each slot heads an overflow chain of entries whose keys hash to that slot. Insertion walks
//! the chain and either overwrites a matching key or appends; lookup and removal walk it the
//! same way. Removing the head promotes the second entry to the head.
//!
//! The number of slots is fixed at construction. Chains absorb any number of entries, so the
//! table never resizes; long chains only cost lookup time.

use super::config::TableConfig;
use super::indexer::HashIndexer;
use super::slot::Entry;
use super::table::{HashTable, Insertion, Placement};
use crate::error::Result;

/// A "bucket" is the chain of entries for one slot, head first.
type Bucket<V> = Vec<Entry<V>>;

/// Slot array of chains.
#[derive(Debug, Clone)]
pub struct SeparateChaining<V> {
    buckets: Vec<Bucket<V>>,
    indexer: HashIndexer,
}

/// A separate-chaining table.
pub type SeparateChainingTable<V> = HashTable<V, SeparateChaining<V>>;

impl<V> SeparateChaining<V> {
    pub fn new(capacity: usize, salt: u64) -> Self {
        let mut buckets = Vec::with_capacity(capacity.max(1));
        buckets.resize_with(capacity.max(1), Default::default);
        SeparateChaining {
            buckets,
            indexer: HashIndexer::default().with_salt(salt),
        }
    }

    /// Internal function computing the bucket index for a given key.
    pub fn bucket_index(&self, key: i64) -> usize {
        self.indexer.index(key, self.buckets.len())
    }

    /// Length of the chain at `bucket`.
    pub fn chain_len(&self, bucket: usize) -> usize {
        self.buckets.get(bucket).map_or(0, Vec::len)
    }
}

impl<V> Placement<V> for SeparateChaining<V> {
    const NAME: &'static str = "separate-chaining";
    const RESIZABLE: bool = false;

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn rebuilt(&mut self, capacity: usize) -> Self {
        SeparateChaining::new(capacity, self.indexer.salt())
    }

    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>> {
        let bucket_index = self.bucket_index(key);
        let bucket = &mut self.buckets[bucket_index];

        // Check if key exists
        for entry in bucket.iter_mut() {
            if entry.key == key {
                let old = std::mem::replace(&mut entry.value, value);
                return Ok(Insertion::Replaced(old));
            }
        }
        // Append at the tail
        bucket.push(Entry::new(key, value, ()));
        Ok(Insertion::Inserted)
    }

    fn try_lookup(&self, key: i64) -> Result<Option<&V>> {
        let idx = self.bucket_index(key);
        Ok(self.buckets[idx]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value))
    }

    fn try_lookup_mut(&mut self, key: i64) -> Result<Option<&mut V>> {
        let idx = self.bucket_index(key);
        Ok(self.buckets[idx]
            .iter_mut()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value))
    }

    fn try_remove(&mut self, key: i64) -> Result<Option<V>> {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        // `remove` keeps chain order, so the successor of a removed head becomes the head
        Ok(bucket
            .iter()
            .position(|entry| entry.key == key)
            .map(|pos| bucket.remove(pos).value))
    }

    fn drain(&mut self) -> Vec<(i64, V)> {
        self.buckets
            .iter_mut()
            .flat_map(|bucket| bucket.drain(..).map(Entry::into_pair))
            .collect()
    }

    fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    fn entry_at(&self, slot: usize, depth: usize) -> Option<(i64, &V)> {
        self.buckets
            .get(slot)?
            .get(depth)
            .map(|entry| (entry.key, &entry.value))
    }
}

impl<V> HashTable<V, SeparateChaining<V>> {
    /// Creates a table with 32 chains.
    pub fn new() -> Self {
        Self::with_config(&TableConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&TableConfig::new().with_min_capacity(capacity))
    }

    pub fn with_config(config: &TableConfig) -> Self {
        let capacity = config.power_of_two_capacity();
        HashTable::from_placement(SeparateChaining::new(capacity, config.salt), capacity)
    }
}

impl<V> Default for HashTable<V, SeparateChaining<V>> {
    fn default() -> Self {
        Self::new()
    }
}
