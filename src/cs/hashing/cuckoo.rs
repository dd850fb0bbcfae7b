//! # Cuckoo Hashing
//!
//! This module provides a **cuckoo** placement strategy: the backing array is split into two
//! disjoint halves, each addressed by its own independently salted hash function. Every key has
//! exactly two candidate slots, one per half, so lookups and removals inspect at most two
//! slots.
//!
//! ## Key Features
//! - **Displacement**: an insertion that finds its first-half slot taken evicts the resident,
//!   which then moves to its slot in the other half, possibly evicting in turn. The ping-pong is
//!   bounded by a kick limit (16 evictions by default).
//! - **Reseeding**: when the kick limit is hit, both salts are redrawn from the table's random
//!   generator, every entry is re-placed under the new functions, and the insertion is retried.
//!   This recovery is invisible to callers.
//! - **Fallback growth**: if a bounded number of reseeds cannot place everything, the entries
//!   left over are handed back to the table, which grows and re-inserts them.
//! - **Reproducible**: the generator is an explicit type parameter, so tests can seed it.
//!
//! ## Example
//! ```rust
//! use hash_tables::hashing::CuckooTable;
//!
//! let mut table = CuckooTable::seeded(32, 7);
//! table.set(1, "one").unwrap();
//! assert_eq!(table.get(1), Ok(&"one"));
//! ```

use log::trace;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::config::TableConfig;
use super::indexer::{HashIndexer, CUCKOO_MULTIPLIERS, PRIMARY_MULTIPLIERS};
use super::slot::{drain_slots, empty_slots, Entry, Slot};
use super::table::{HashTable, Insertion, Placement};
use crate::error::Result;

/// Two-half storage with bounded displacement.
#[derive(Debug, Clone)]
pub struct Cuckoo<V, R = ChaCha20Rng> {
    // each half has `slots.len() / 2` slots
    slots: Vec<Slot<V>>,
    hasher1: HashIndexer,
    hasher2: HashIndexer,
    max_kicks: usize,
    max_reseeds: usize,
    reseeds: usize,
    rng: R,
}

/// A cuckoo-hashing table.
pub type CuckooTable<V, R = ChaCha20Rng> = HashTable<V, Cuckoo<V, R>>;

impl<V, R: RngCore + Clone> Cuckoo<V, R> {
    /// Creates a store of `capacity` slots (rounded up to even) with salts drawn from `rng`.
    pub fn new(capacity: usize, max_kicks: usize, max_reseeds: usize, mut rng: R) -> Self {
        let capacity = capacity.max(2).next_multiple_of(2);
        let hasher1 = HashIndexer::new(rng.gen(), PRIMARY_MULTIPLIERS);
        let hasher2 = HashIndexer::new(rng.gen(), CUCKOO_MULTIPLIERS);
        Cuckoo {
            slots: empty_slots(capacity),
            hasher1,
            hasher2,
            max_kicks,
            max_reseeds,
            reseeds: 0,
            rng,
        }
    }

    /// The current `(first, second)` salts.
    pub fn seeds(&self) -> (u64, u64) {
        (self.hasher1.salt(), self.hasher2.salt())
    }

    /// How many times this store has reseeded itself.
    pub fn reseeds(&self) -> usize {
        self.reseeds
    }

    fn half(&self) -> usize {
        self.slots.len() / 2
    }

    /// Candidate slot of `key` in the first half.
    pub fn first_slot(&self, key: i64) -> usize {
        self.hasher1.index(key, self.half())
    }

    /// Candidate slot of `key` in the second half.
    pub fn second_slot(&self, key: i64) -> usize {
        self.half() + self.hasher2.index(key, self.half())
    }

    /// The slot currently holding `key`, if any.
    pub fn position(&self, key: i64) -> Option<usize> {
        [self.first_slot(key), self.second_slot(key)]
            .into_iter()
            .find(|&index| self.slots[index].holds(key))
    }

    /// Redraws both salts.
    fn reseed(&mut self) {
        self.hasher1 = self.hasher1.with_salt(self.rng.gen());
        self.hasher2 = self.hasher2.with_salt(self.rng.gen());
        self.reseeds += 1;
    }

    /// Places an entry, evicting residents for up to `max_kicks` steps.
    /// On failure returns the entry left without a slot.
    fn kick(&mut self, key: i64, value: V) -> std::result::Result<(), (i64, V)> {
        let mut carry = Entry::new(key, value, ());
        let mut index = self.first_slot(key);
        let mut in_first = true;

        for _ in 0..self.max_kicks {
            match std::mem::take(&mut self.slots[index]) {
                Slot::Occupied(resident) => {
                    self.slots[index] = Slot::Occupied(carry);
                    carry = resident;
                }
                Slot::Empty | Slot::Tombstone => {
                    self.slots[index] = Slot::Occupied(carry);
                    return Ok(());
                }
            }
            // the evicted entry moves to its slot in the other half
            in_first = !in_first;
            index = if in_first {
                self.first_slot(carry.key)
            } else {
                self.second_slot(carry.key)
            };
        }
        if self.slots[index].is_occupied() {
            return Err(carry.into_pair());
        }
        self.slots[index] = Slot::Occupied(carry);
        Ok(())
    }

    /// Places everything in `pending`. On failure the homeless entry is pushed back.
    fn kick_all(&mut self, pending: &mut Vec<(i64, V)>) -> bool {
        while let Some((key, value)) = pending.pop() {
            if let Err(homeless) = self.kick(key, value) {
                pending.push(homeless);
                return false;
            }
        }
        true
    }
}

impl<V, R: RngCore + Clone> Placement<V> for Cuckoo<V, R> {
    const NAME: &'static str = "cuckoo";

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn rebuilt(&mut self, capacity: usize) -> Self {
        // every full rehash runs under fresh salts
        let fresh = Cuckoo::new(capacity, self.max_kicks, self.max_reseeds, self.rng.clone());
        // keep this generator in step with the clone so a retried rebuild draws new salts
        self.rng.next_u64();
        self.rng.next_u64();
        fresh
    }

    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>> {
        if let Some(index) = self.position(key) {
            if let Some(entry) = self.slots[index].entry_mut() {
                return Ok(Insertion::Replaced(std::mem::replace(&mut entry.value, value)));
            }
        }

        let homeless = match self.kick(key, value) {
            Ok(()) => return Ok(Insertion::Inserted),
            Err(homeless) => homeless,
        };

        let mut pending = vec![homeless];
        for attempt in 1..=self.max_reseeds {
            pending.extend(drain_slots(&mut self.slots));
            self.reseed();
            trace!(
                "cuckoo: kick limit hit, reseed {} of {} at {} slots",
                attempt,
                self.max_reseeds,
                self.slots.len()
            );
            if self.kick_all(&mut pending) {
                return Ok(Insertion::Inserted);
            }
        }
        Ok(Insertion::Full(pending))
    }

    fn try_lookup(&self, key: i64) -> Result<Option<&V>> {
        Ok(self
            .position(key)
            .and_then(|index| self.slots[index].entry())
            .map(|e| &e.value))
    }

    fn try_lookup_mut(&mut self, key: i64) -> Result<Option<&mut V>> {
        Ok(match self.position(key) {
            Some(index) => self.slots[index].entry_mut().map(|e| &mut e.value),
            None => None,
        })
    }

    fn try_remove(&mut self, key: i64) -> Result<Option<V>> {
        Ok(self
            .position(key)
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

impl<V, R: RngCore + Clone> HashTable<V, Cuckoo<V, R>> {
    /// Creates a table whose reseeds draw from `rng`.
    pub fn with_rng(config: &TableConfig, rng: R) -> Self {
        let capacity = config.power_of_two_capacity();
        let store = Cuckoo::new(capacity, config.max_kicks, config.max_reseeds, rng);
        HashTable::from_placement(store, capacity)
    }
}

impl<V> HashTable<V, Cuckoo<V, ChaCha20Rng>> {
    /// Creates a table with the default minimum capacity of 32 and an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_config(&TableConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&TableConfig::new().with_min_capacity(capacity))
    }

    pub fn with_config(config: &TableConfig) -> Self {
        Self::with_rng(config, ChaCha20Rng::from_entropy())
    }

    /// Creates a table whose salts and reseeds are fully determined by `seed`.
    pub fn seeded(capacity: usize, seed: u64) -> Self {
        let config = TableConfig::new().with_min_capacity(capacity);
        Self::with_rng(&config, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<V> Default for HashTable<V, Cuckoo<V, ChaCha20Rng>> {
    fn default() -> Self {
        Self::new()
    }
}
