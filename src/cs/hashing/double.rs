//! # Double Hashing with Lazy Deletion
//!
//! Open addressing where the probe sequence from home index `i0` is
//! `i0, i0 + s, i0 + 2s, ...` (mod capacity), with the step `s` drawn from a second,
//! independent hash of the key.
//!
//! ## Key Features
//! - **Non-zero step**: `s` is the secondary hash reduced modulo `capacity - 1`, plus one. It is
//!   then forced odd, which makes it coprime with the power-of-two capacity, so every probe
//!   sequence visits every slot.
//! - **Tombstones**: removal leaves a `Tombstone`, so later probes for other keys continue past
//!   the removed slot instead of stopping short. A new key re-uses the first tombstone on its
//!   probe path once the probe has proven the key absent.
//! - **Purge**: once tombstones exceed 20% of capacity the table is rebuilt, which drops them.

use super::config::TableConfig;
use super::indexer::{HashIndexer, SECONDARY_MULTIPLIERS};
use super::slot::{drain_slots, empty_slots, Entry, Slot};
use super::table::{HashTable, Insertion, Placement, Rebuild};
use crate::error::{Error, Result};

/// Salt perturbation that decorrelates the step hash from the home hash.
const SECONDARY_SALT_MIX: u64 = 0xD6E8_FEB8_6659_FD93;

/// Result of walking a probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key sits at this index.
    Found(usize),
    /// The key is absent; this is where it should go.
    Vacant(usize),
    /// Every slot was visited without finding the key or a free slot.
    Exhausted,
}

/// Tombstoned open addressing with a hashed probe step.
#[derive(Debug, Clone)]
pub struct DoubleHashing<V> {
    slots: Vec<Slot<V>>,
    tombstones: usize,
    tombstone_ratio: f64,
    primary: HashIndexer,
    secondary: HashIndexer,
}

/// A double-hashing table.
pub type DoubleHashingTable<V> = HashTable<V, DoubleHashing<V>>;

impl<V> DoubleHashing<V> {
    pub fn new(capacity: usize, tombstone_ratio: f64, salt: u64) -> Self {
        DoubleHashing {
            slots: empty_slots(capacity.max(2)),
            tombstones: 0,
            tombstone_ratio,
            primary: HashIndexer::default().with_salt(salt),
            secondary: HashIndexer::new(salt ^ SECONDARY_SALT_MIX, SECONDARY_MULTIPLIERS),
        }
    }

    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// The first slot probed for `key`.
    pub fn home(&self, key: i64) -> usize {
        self.primary.index(key, self.slots.len())
    }

    /// The distance between consecutive probes for `key`. Always odd and in `[1, capacity)`.
    pub fn step(&self, key: i64) -> usize {
        let capacity = self.slots.len();
        if capacity <= 2 {
            return 1;
        }
        (self.secondary.index(key, capacity - 1) + 1) | 1
    }

    fn probe(&self, key: i64) -> Probe {
        let capacity = self.slots.len();
        let step = self.step(key);
        let mut index = self.home(key);
        let mut first_tombstone = None;

        for _ in 0..capacity {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
                Slot::Occupied(entry) if entry.key == key => return Probe::Found(index),
                Slot::Occupied(_) => {}
            }
            index = (index + step) % capacity;
        }
        first_tombstone.map_or(Probe::Exhausted, Probe::Vacant)
    }
}

impl<V> Placement<V> for DoubleHashing<V> {
    const NAME: &'static str = "double-hashing";

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn rebuilt(&mut self, capacity: usize) -> Self {
        DoubleHashing::new(capacity, self.tombstone_ratio, self.primary.salt())
    }

    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>> {
        match self.probe(key) {
            Probe::Found(index) => {
                let entry = self.slots[index]
                    .entry_mut()
                    .ok_or(Error::InvariantViolation("probe reported a vacant slot as found"))?;
                Ok(Insertion::Replaced(std::mem::replace(&mut entry.value, value)))
            }
            Probe::Vacant(index) => {
                if self.slots[index].is_tombstone() {
                    self.tombstones -= 1;
                }
                self.slots[index] = Slot::Occupied(Entry::new(key, value, ()));
                Ok(Insertion::Inserted)
            }
            Probe::Exhausted => Err(Error::InvariantViolation(
                "double hashing probe found no free slot",
            )),
        }
    }

    fn try_lookup(&self, key: i64) -> Result<Option<&V>> {
        Ok(match self.probe(key) {
            Probe::Found(index) => self.slots[index].entry().map(|e| &e.value),
            _ => None,
        })
    }

    fn try_lookup_mut(&mut self, key: i64) -> Result<Option<&mut V>> {
        Ok(match self.probe(key) {
            Probe::Found(index) => self.slots[index].entry_mut().map(|e| &mut e.value),
            _ => None,
        })
    }

    fn try_remove(&mut self, key: i64) -> Result<Option<V>> {
        let Probe::Found(index) = self.probe(key) else {
            return Ok(None);
        };
        let removed = self.slots[index].bury();
        if removed.is_some() {
            self.tombstones += 1;
        }
        Ok(removed.map(|e| e.value))
    }

    fn needs_rebuild(&self) -> Option<Rebuild> {
        let limit = self.slots.len() as f64 * self.tombstone_ratio;
        (self.tombstones as f64 > limit).then_some(Rebuild::Refresh)
    }

    fn drain(&mut self) -> Vec<(i64, V)> {
        self.tombstones = 0;
        drain_slots(&mut self.slots)
    }

    fn clear(&mut self) {
        self.slots.fill_with(Default::default);
        self.tombstones = 0;
    }

    fn entry_at(&self, slot: usize, depth: usize) -> Option<(i64, &V)> {
        if depth > 0 {
            return None;
        }
        self.slots.get(slot)?.entry().map(|e| (e.key, &e.value))
    }
}

impl<V> HashTable<V, DoubleHashing<V>> {
    /// Creates a table with the default minimum capacity of 32.
    pub fn new() -> Self {
        Self::with_config(&TableConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&TableConfig::new().with_min_capacity(capacity))
    }

    pub fn with_config(config: &TableConfig) -> Self {
        let capacity = config.power_of_two_capacity();
        let store = DoubleHashing::new(capacity, config.tombstone_ratio, config.salt);
        HashTable::from_placement(store, capacity)
    }
}

impl<V> Default for HashTable<V, DoubleHashing<V>> {
    fn default() -> Self {
        Self::new()
    }
}
