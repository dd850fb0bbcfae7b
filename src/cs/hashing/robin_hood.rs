//! # Robin Hood Hashing
//!
//! Linear probing where every entry remembers its **probe distance**, the number of slots
//! between its home index and where it actually sits. An inserting entry that meets a resident
//! closer to home than itself takes the resident's slot and carries the resident onwards
//! ("takes from the rich, gives to the poor"). This keeps probe distances uniformly short.
//!
//! Lookup stops early at an empty slot or at a resident whose distance is smaller than the
//! current probe length: the key would have displaced it, so it cannot be further along.
//!
//! Removal uses backward-shift deletion instead of tombstones: the following entries are pulled
//! one slot back until an empty slot or an entry already at home is reached.
//!
//! ```
//! use hash_tables::hashing::RobinHoodTable;
//!
//! let mut table = RobinHoodTable::new();
//! for key in 0..100 {
//!     table.set(key, key * key).unwrap();
//! }
//! assert_eq!(table.get(9), Ok(&81));
//! assert_eq!(table.remove(9), Ok(81));
//! assert!(!table.contains(9));
//! ```

use super::config::TableConfig;
use super::indexer::HashIndexer;
use super::slot::{drain_slots, empty_slots, Entry, Slot};
use super::table::{HashTable, Insertion, Placement};
use crate::error::{Error, Result};

/// Linear probing with displacement by probe distance.
#[derive(Debug, Clone)]
pub struct RobinHood<V> {
    // entry meta is the probe distance
    slots: Vec<Slot<V, usize>>,
    indexer: HashIndexer,
}

/// A Robin Hood table.
pub type RobinHoodTable<V> = HashTable<V, RobinHood<V>>;

impl<V> RobinHood<V> {
    pub fn new(capacity: usize, salt: u64) -> Self {
        RobinHood {
            slots: empty_slots(capacity.max(1)),
            indexer: HashIndexer::default().with_salt(salt),
        }
    }

    pub fn home(&self, key: i64) -> usize {
        self.indexer.index(key, self.slots.len())
    }

    /// Probe distance of every slot, `None` where the slot is empty.
    pub fn probe_distances(&self) -> Vec<Option<usize>> {
        self.slots
            .iter()
            .map(|slot| slot.entry().map(|e| e.meta))
            .collect()
    }

    /// Largest probe distance currently in the table.
    pub fn max_probe_distance(&self) -> usize {
        self.probe_distances().into_iter().flatten().max().unwrap_or(0)
    }

    fn find(&self, key: i64) -> Option<usize> {
        let capacity = self.slots.len();
        let mut index = self.home(key);
        for distance in 0..capacity {
            let entry = self.slots[index].entry()?;
            if entry.meta < distance {
                return None;
            }
            if entry.key == key {
                return Some(index);
            }
            index = (index + 1) % capacity;
        }
        None
    }
}

impl<V> Placement<V> for RobinHood<V> {
    const NAME: &'static str = "robin-hood";

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn rebuilt(&mut self, capacity: usize) -> Self {
        RobinHood::new(capacity, self.indexer.salt())
    }

    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>> {
        if let Some(index) = self.find(key) {
            if let Some(entry) = self.slots[index].entry_mut() {
                return Ok(Insertion::Replaced(std::mem::replace(&mut entry.value, value)));
            }
        }

        let capacity = self.slots.len();
        let mut index = self.home(key);
        let mut carry = Entry::new(key, value, 0);
        for _ in 0..capacity {
            match &mut self.slots[index] {
                Slot::Occupied(resident) => {
                    if carry.meta > resident.meta {
                        std::mem::swap(&mut carry, resident);
                    }
                }
                vacant => {
                    *vacant = Slot::Occupied(carry);
                    return Ok(Insertion::Inserted);
                }
            }
            carry.meta += 1;
            index = (index + 1) % capacity;
        }
        Err(Error::InvariantViolation("robin hood probe found no free slot"))
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
        let Some(mut hole) = self.find(key) else {
            return Ok(None);
        };
        let removed = self.slots[hole].take();

        // backward shift
        let capacity = self.slots.len();
        for _ in 1..capacity {
            let next = (hole + 1) % capacity;
            match self.slots[next].entry() {
                Some(entry) if entry.meta > 0 => {}
                _ => break,
            }
            let mut shifted = std::mem::take(&mut self.slots[next]);
            if let Some(entry) = shifted.entry_mut() {
                entry.meta -= 1;
            }
            self.slots[hole] = shifted;
            hole = next;
        }
        Ok(removed.map(|e| e.value))
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

impl<V> HashTable<V, RobinHood<V>> {
    /// Creates a table with the default minimum capacity of 32.
    pub fn new() -> Self {
        Self::with_config(&TableConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&TableConfig::new().with_min_capacity(capacity))
    }

    pub fn with_config(config: &TableConfig) -> Self {
        let capacity = config.power_of_two_capacity();
        HashTable::from_placement(RobinHood::new(capacity, config.salt), capacity)
    }
}

impl<V> Default for HashTable<V, RobinHood<V>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every entry sits exactly `meta` slots past its home, and no resident is more than one
    /// slot "richer" than its predecessor.
    fn assert_invariants(store: &RobinHood<i64>) {
        let capacity = store.capacity();
        for (index, slot) in store.slots.iter().enumerate() {
            let Some(entry) = slot.entry() else { continue };
            assert_eq!((store.home(entry.key) + entry.meta) % capacity, index);
            if entry.meta > 0 {
                let prev = store.slots[(index + capacity - 1) % capacity].entry();
                assert!(prev.is_some_and(|p| p.meta + 1 >= entry.meta));
            }
        }
    }

    #[test]
    fn distances_match_positions() {
        let mut table = RobinHoodTable::with_capacity(64);
        for key in 0..30 {
            table.set(key, key).unwrap();
            assert_invariants(table.placement());
        }
        for key in 0..30 {
            assert_eq!(table.get(key), Ok(&key));
        }
    }

    #[test]
    fn richer_resident_is_displaced() {
        let mut store: RobinHood<i64> = RobinHood::new(8, 0);
        let home = store.home(1);
        // a resident sitting at its own home, plus an incoming key probing past it
        store.slots[home] = Slot::Occupied(Entry::new(-1, -1, 0));
        let next = (home + 1) % 8;
        store.slots[next] = Slot::Occupied(Entry::new(-2, -2, 0));
        store.try_insert(1, 1).unwrap();
        // key 1 arrives at `next` with distance 1 and evicts the distance-0 resident
        assert_eq!(store.slots[next].entry().map(|e| (e.key, e.meta)), Some((1, 1)));
        assert_eq!(
            store.slots[(home + 2) % 8].entry().map(|e| (e.key, e.meta)),
            Some((-2, 1))
        );
    }

    #[test]
    fn backward_shift_closes_gaps() {
        let mut table = RobinHoodTable::with_capacity(64);
        for key in 0..30 {
            table.set(key, key).unwrap();
        }
        for key in (0..30).filter(|k| k % 2 == 0) {
            assert_eq!(table.remove(key), Ok(key));
            assert_invariants(table.placement());
        }
        assert!(table
            .placement()
            .slots
            .iter()
            .all(|slot| !slot.is_tombstone()));
        for key in 0..30 {
            assert_eq!(table.contains(key), key % 2 == 1);
        }
    }

    #[test]
    fn probe_distances_stay_short() {
        let mut table = RobinHoodTable::new();
        for key in 0..2000 {
            table.set(key * 7919, key).unwrap();
        }
        assert!(table.placement().max_probe_distance() < 32);
    }
}
