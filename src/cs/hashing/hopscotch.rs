//! # Hopscotch Hashing
//!
//! Every key lives within a fixed **neighborhood** of `H` consecutive slots (32 by default)
//! starting at its home index, with wrap-around. Lookups and removals scan only that window.
//!
//! Insertion scans forward from the home index for the first empty slot. If the empty slot is
//! outside the neighborhood, it is hopped backwards: among the `H - 1` slots before it, the
//! farthest entry that may legally move into the empty slot (the empty slot is still inside
//! *that* entry's neighborhood) is moved there, and the vacated slot becomes the new empty slot.
//! This repeats until the empty slot falls inside the new key's neighborhood. If no entry can
//! hop, the table counts as full at this capacity and grows.
//!
//! Every entry records its home index, so eligibility checks need no rehashing.

use super::config::{TableConfig, MAX_NEIGHBORHOOD};
use super::indexer::HashIndexer;
use super::slot::{drain_slots, empty_slots, Entry, Slot};
use super::table::{HashTable, Insertion, Placement};
use crate::error::Result;

/// Neighborhood-bounded open addressing.
#[derive(Debug, Clone)]
pub struct Hopscotch<V> {
    // entry meta is the home index
    slots: Vec<Slot<V, usize>>,
    neighborhood: usize,
    indexer: HashIndexer,
}

/// A hopscotch-hashing table.
pub type HopscotchTable<V> = HashTable<V, Hopscotch<V>>;

impl<V> Hopscotch<V> {
    pub fn new(capacity: usize, neighborhood: usize, salt: u64) -> Self {
        Hopscotch {
            slots: empty_slots(capacity.max(1)),
            neighborhood: neighborhood.clamp(1, MAX_NEIGHBORHOOD),
            indexer: HashIndexer::default().with_salt(salt),
        }
    }

    /// Effective neighborhood width; never wider than the table.
    pub fn neighborhood(&self) -> usize {
        self.neighborhood.min(self.slots.len())
    }

    pub fn home(&self, key: i64) -> usize {
        self.indexer.index(key, self.slots.len())
    }

    /// Forward distance from slot `from` to slot `to`, wrapping around.
    fn distance(&self, from: usize, to: usize) -> usize {
        (to + self.slots.len() - from) % self.slots.len()
    }

    /// Offset of every live entry from its home index, in slot order.
    pub fn home_offsets(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.entry().map(|e| self.distance(e.meta, index)))
            .collect()
    }

    fn find(&self, key: i64) -> Option<usize> {
        let home = self.home(key);
        (0..self.neighborhood())
            .map(|offset| (home + offset) % self.slots.len())
            .find(|&index| self.slots[index].holds(key))
    }

    /// Moves the empty slot at `empty` backwards by one hop. Returns the new empty slot.
    fn hop_back(&mut self, empty: usize) -> Option<usize> {
        let capacity = self.slots.len();
        let neighborhood = self.neighborhood();
        // farthest candidate first, so each hop covers as much ground as possible
        for back in (1..neighborhood).rev() {
            let candidate = (empty + capacity - back) % capacity;
            let eligible = match self.slots[candidate].entry() {
                Some(entry) => self.distance(entry.meta, candidate) + back < neighborhood,
                None => false,
            };
            if eligible {
                self.slots.swap(candidate, empty);
                return Some(candidate);
            }
        }
        None
    }
}

impl<V> Placement<V> for Hopscotch<V> {
    const NAME: &'static str = "hopscotch";

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn rebuilt(&mut self, capacity: usize) -> Self {
        Hopscotch::new(capacity, self.neighborhood, self.indexer.salt())
    }

    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>> {
        if let Some(index) = self.find(key) {
            if let Some(entry) = self.slots[index].entry_mut() {
                return Ok(Insertion::Replaced(std::mem::replace(&mut entry.value, value)));
            }
        }

        let capacity = self.slots.len();
        let home = self.home(key);
        let Some(mut offset) = (0..capacity).find(|&d| self.slots[(home + d) % capacity].is_empty())
        else {
            return Ok(Insertion::Full(vec![(key, value)]));
        };
        let mut empty = (home + offset) % capacity;

        while offset >= self.neighborhood() {
            match self.hop_back(empty) {
                Some(vacated) => {
                    offset -= self.distance(vacated, empty);
                    empty = vacated;
                }
                None => return Ok(Insertion::Full(vec![(key, value)])),
            }
        }

        self.slots[empty] = Slot::Occupied(Entry::new(key, value, home));
        Ok(Insertion::Inserted)
    }

    fn try_lookup(&self, key: i64) -> Result<Option<&V>> {
        Ok(self
            .find(key)
            .and_then(|index| self.slots[index].entry())
            .map(|e| &e.value))
    }

    fn try_lookup_mut(&mut self, key: i64) -> Result<Option<&mut V>> {
        Ok(match self.find(key) {
            Some(index) => self.slots[index].entry_mut().map(|e| &mut e.value),
            None => None,
        })
    }

    fn try_remove(&mut self, key: i64) -> Result<Option<V>> {
        Ok(self
            .find(key)
            .and_then(|index| self.slots[index].take())
            .map(|e| e.value))
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

impl<V> HashTable<V, Hopscotch<V>> {
    /// Creates a table with the default minimum capacity of 32.
    pub fn new() -> Self {
        Self::with_config(&TableConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&TableConfig::new().with_min_capacity(capacity))
    }

    /// The minimum capacity is raised to at least one neighborhood.
    pub fn with_config(config: &TableConfig) -> Self {
        let capacity = config
            .power_of_two_capacity()
            .max(config.neighborhood.next_power_of_two());
        let store = Hopscotch::new(capacity, config.neighborhood, config.salt);
        HashTable::from_placement(store, capacity)
    }
}

impl<V> Default for HashTable<V, Hopscotch<V>> {
    fn default() -> Self {
        Self::new()
    }
}
