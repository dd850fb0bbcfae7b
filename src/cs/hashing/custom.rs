//! # Custom-Hashing Table
//!
//! Any integer key is mapped through the [`HashIndexer`] into a fixed array, and collisions
//! are **not** resolved: setting a key whose slot already holds a different key overwrites that
//! entry, which silently disappears from the table. This is the failure mode every other variant
//! exists to prevent.
//!
//! The stored key is kept alongside the value, so a key that lost its slot reads as absent
//! rather than returning another key's value.

use super::config::TableConfig;
use super::indexer::{HashIndexer, CUSTOM_MULTIPLIERS};
use super::slot::{drain_slots, empty_slots, Entry, Slot};
use super::table::{HashTable, Insertion, Placement};
use crate::error::Result;

/// Fixed-size hashed storage without collision handling.
#[derive(Debug, Clone)]
pub struct CustomHashing<V> {
    slots: Vec<Slot<V>>,
    indexer: HashIndexer,
}

/// A custom-hashing table.
pub type CustomHashTable<V> = HashTable<V, CustomHashing<V>>;

impl<V> CustomHashing<V> {
    pub fn new(capacity: usize, salt: u64) -> Self {
        CustomHashing {
            slots: empty_slots(capacity.max(1)),
            indexer: HashIndexer::new(salt, CUSTOM_MULTIPLIERS),
        }
    }

    /// The slot `key` maps to.
    pub fn home(&self, key: i64) -> usize {
        self.indexer.index(key, self.slots.len())
    }
}

impl<V> Placement<V> for CustomHashing<V> {
    const NAME: &'static str = "custom-hashing";
    const RESIZABLE: bool = false;

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn rebuilt(&mut self, capacity: usize) -> Self {
        CustomHashing::new(capacity, self.indexer.salt())
    }

    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>> {
        let index = self.home(key);
        let entry = Slot::Occupied(Entry::new(key, value, ()));
        let previous = std::mem::replace(&mut self.slots[index], entry);
        Ok(match previous {
            Slot::Occupied(old) if old.key == key => Insertion::Replaced(old.value),
            Slot::Occupied(old) => Insertion::Evicted {
                key: old.key,
                value: old.value,
            },
            Slot::Empty | Slot::Tombstone => Insertion::Inserted,
        })
    }

    fn try_lookup(&self, key: i64) -> Result<Option<&V>> {
        let slot = &self.slots[self.home(key)];
        Ok(slot.entry().filter(|e| e.key == key).map(|e| &e.value))
    }

    fn try_lookup_mut(&mut self, key: i64) -> Result<Option<&mut V>> {
        let index = self.home(key);
        Ok(self.slots[index]
            .entry_mut()
            .filter(|e| e.key == key)
            .map(|e| &mut e.value))
    }

    fn try_remove(&mut self, key: i64) -> Result<Option<V>> {
        let index = self.home(key);
        if !self.slots[index].holds(key) {
            return Ok(None);
        }
        Ok(self.slots[index].take().map(|e| e.value))
    }

    fn drain(&mut self) -> Vec<(i64, V)> {
        drain_slots(&mut self.slots)
    }

    fn clear(&mut self) {
        self.slots.fill_with(Default::default);
    }

    fn entry_at(&self, slot: usize, depth: usize) -> Option<(i64, &V)> {
        if depth > 0 {
            return None;
        }
        self.slots.get(slot)?.entry().map(|e| (e.key, &e.value))
    }
}

impl<V> HashTable<V, CustomHashing<V>> {
    /// Creates a table with the default capacity of 32.
    pub fn new() -> Self {
        Self::with_config(&TableConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&TableConfig::new().with_min_capacity(capacity))
    }

    /// Uses `min_capacity` (rounded up to a power of two) as the fixed capacity.
    pub fn with_config(config: &TableConfig) -> Self {
        let capacity = config.power_of_two_capacity();
        HashTable::from_placement(CustomHashing::new(capacity, config.salt), capacity)
    }
}

impl<V> Default for HashTable<V, CustomHashing<V>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Finds two distinct keys that share a slot.
    fn colliding_pair(table: &CustomHashTable<&str>) -> (i64, i64) {
        let store = table.placement();
        let first = 0;
        let second = (1..)
            .find(|&k| store.home(k) == store.home(first))
            .unwrap();
        (first, second)
    }

    #[test]
    fn overwrite_same_key() {
        let mut table = CustomHashTable::new();
        table.set(1, "Jira").unwrap();
        assert_eq!(table.set(1, "Jason").unwrap(), Some("Jira"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1), Ok(&"Jason"));
    }

    #[test]
    fn collision_discards_previous_key() {
        let mut table = CustomHashTable::with_capacity(8);
        let (a, b) = colliding_pair(&table);

        table.set(a, "first").unwrap();
        assert_eq!(table.set(b, "second").unwrap(), None);

        // the slot now belongs to b; a is gone and the size did not grow
        assert_eq!(table.len(), 1);
        assert!(!table.contains(a));
        assert_eq!(table.get(a), Err(Error::KeyNotFound(a)));
        assert_eq!(table.get(b), Ok(&"second"));
    }

    #[test]
    fn remove_absent_key_reports_not_found() {
        let mut table: CustomHashTable<i32> = CustomHashTable::new();
        assert_eq!(table.remove(5), Err(Error::KeyNotFound(5)));
        table.set(5, 50).unwrap();
        assert_eq!(table.remove(5), Ok(50));
        assert!(table.is_empty());
    }

    #[test]
    fn capacity_is_fixed() {
        let mut table = CustomHashTable::with_capacity(16);
        for key in 0..200 {
            table.set(key, key).unwrap();
        }
        assert_eq!(table.capacity(), 16);
        assert!(table.len() <= 16);
        assert_eq!(table.len(), table.iter().count());
    }
}
