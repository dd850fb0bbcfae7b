//! # Coalesced Chaining Hash Table
//!
//! The backing array is split into a **primary region**, addressed by the hash indexer, and a
//! **cellar** of roughly 14% of capacity that only ever holds overflow entries. Chains live
//! inside the array itself: every entry carries the index of the next entry in its chain.
//!
//! - **Insert**: an empty home slot takes the entry directly. Otherwise the chain starting at
//!   the home slot is walked (overwriting on a key match) and a new entry is linked from the
//!   tail into the highest free cellar slot.
//! - **Remove**: deleting a chain head pulls the next entry of the chain into the head slot,
//!   and the chain continues from there; deleting an interior entry splices it out. Either way
//!   one cellar slot is freed.
//!
//! Besides the shared load-factor policy (measured against the primary region), the table is
//! rebuilt at double capacity as soon as the cellar is full.

use super::config::TableConfig;
use super::indexer::HashIndexer;
use super::slot::{drain_slots, empty_slots, Entry, Slot};
use super::table::{HashTable, Insertion, Placement, Rebuild};
use crate::error::{Error, Result};

/// Chain link stored with every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Link {
    pub next: Option<usize>,
}

/// In-array chained storage with a reserved cellar.
#[derive(Debug, Clone)]
pub struct Coalesced<V> {
    slots: Vec<Slot<V, Link>>,
    primary: usize,
    cellar_used: usize,
    cellar_ratio: f64,
    indexer: HashIndexer,
}

/// A coalesced-chaining table.
pub type CoalescedTable<V> = HashTable<V, Coalesced<V>>;

impl<V> Coalesced<V> {
    pub fn new(capacity: usize, cellar_ratio: f64, salt: u64) -> Self {
        let capacity = capacity.max(2);
        // both regions need at least one slot
        let cellar = ((capacity as f64 * cellar_ratio) as usize).clamp(1, capacity - 1);
        Coalesced {
            slots: empty_slots(capacity),
            primary: capacity - cellar,
            cellar_used: 0,
            cellar_ratio,
            indexer: HashIndexer::default().with_salt(salt),
        }
    }

    /// Size of the hashed region.
    pub fn primary_len(&self) -> usize {
        self.primary
    }

    /// Size of the overflow-only region.
    pub fn cellar_len(&self) -> usize {
        self.slots.len() - self.primary
    }

    /// Occupied cellar slots.
    pub fn cellar_used(&self) -> usize {
        self.cellar_used
    }

    /// The primary slot `key` hashes to.
    pub fn home(&self, key: i64) -> usize {
        self.indexer.index(key, self.primary)
    }

    /// Slot indices of the chain rooted at primary slot `home`, head first.
    pub fn chain(&self, home: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut at = Some(home);
        while let Some(index) = at {
            match self.slots.get(index).and_then(Slot::entry) {
                Some(entry) if chain.len() < self.slots.len() => {
                    chain.push(index);
                    at = entry.meta.next;
                }
                _ => break,
            }
        }
        chain
    }

    /// Index of the slot holding `key`.
    fn find(&self, key: i64) -> Option<usize> {
        let mut at = self.home(key);
        for _ in 0..self.slots.len() {
            let entry = self.slots[at].entry()?;
            if entry.key == key {
                return Some(at);
            }
            at = entry.meta.next?;
        }
        None
    }

    fn free_cellar_slot(&self) -> Option<usize> {
        (self.primary..self.slots.len())
            .rev()
            .find(|&index| self.slots[index].is_empty())
    }
}

impl<V> Placement<V> for Coalesced<V> {
    const NAME: &'static str = "coalesced-chaining";

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn load_capacity(&self) -> usize {
        self.primary
    }

    fn rebuilt(&mut self, capacity: usize) -> Self {
        Coalesced::new(capacity, self.cellar_ratio, self.indexer.salt())
    }

    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>> {
        let home = self.home(key);
        if self.slots[home].is_empty() {
            self.slots[home] = Slot::Occupied(Entry::new(key, value, Link::default()));
            return Ok(Insertion::Inserted);
        }

        // walk to the tail, overwriting on a match along the way
        let mut tail = home;
        let mut steps = 0;
        loop {
            let entry = self.slots[tail]
                .entry_mut()
                .ok_or(Error::InvariantViolation("coalesced chain links to an empty slot"))?;
            if entry.key == key {
                return Ok(Insertion::Replaced(std::mem::replace(&mut entry.value, value)));
            }
            match entry.meta.next {
                Some(next) => tail = next,
                None => break,
            }
            steps += 1;
            if steps > self.slots.len() {
                return Err(Error::InvariantViolation("coalesced chain is cyclic"));
            }
        }

        let Some(free) = self.free_cellar_slot() else {
            return Ok(Insertion::Full(vec![(key, value)]));
        };
        self.slots[free] = Slot::Occupied(Entry::new(key, value, Link::default()));
        if let Some(entry) = self.slots[tail].entry_mut() {
            entry.meta.next = Some(free);
        }
        self.cellar_used += 1;
        Ok(Insertion::Inserted)
    }

    fn try_lookup(&self, key: i64) -> Result<Option<&V>> {
        Ok(self
            .find(key)
            .and_then(|index| self.slots[index].entry())
            .map(|entry| &entry.value))
    }

    fn try_lookup_mut(&mut self, key: i64) -> Result<Option<&mut V>> {
        Ok(match self.find(key) {
            Some(index) => self.slots[index].entry_mut().map(|entry| &mut entry.value),
            None => None,
        })
    }

    fn try_remove(&mut self, key: i64) -> Result<Option<V>> {
        let home = self.home(key);
        let Some(head) = self.slots[home].entry() else {
            return Ok(None);
        };

        if head.key == key {
            let next = head.meta.next;
            let removed = match next {
                // promote the successor into the head slot; its link continues the chain
                Some(next) => {
                    let promoted = std::mem::take(&mut self.slots[next]);
                    self.cellar_used -= 1;
                    std::mem::replace(&mut self.slots[home], promoted)
                }
                None => std::mem::take(&mut self.slots[home]),
            };
            return Ok(match removed {
                Slot::Occupied(entry) => Some(entry.value),
                _ => None,
            });
        }

        let mut prev = home;
        for _ in 0..self.slots.len() {
            let Some(current) = self.slots[prev].entry().and_then(|e| e.meta.next) else {
                return Ok(None);
            };
            if self.slots[current].holds(key) {
                let removed = self.slots[current]
                    .take()
                    .ok_or(Error::InvariantViolation("coalesced chain lost an entry"))?;
                if let Some(entry) = self.slots[prev].entry_mut() {
                    entry.meta.next = removed.meta.next;
                }
                self.cellar_used -= 1;
                return Ok(Some(removed.value));
            }
            prev = current;
        }
        Err(Error::InvariantViolation("coalesced chain is cyclic"))
    }

    fn needs_rebuild(&self) -> Option<Rebuild> {
        (self.cellar_used >= self.cellar_len()).then_some(Rebuild::Grow)
    }

    fn drain(&mut self) -> Vec<(i64, V)> {
        self.cellar_used = 0;
        drain_slots(&mut self.slots)
    }

    fn clear(&mut self) {
        self.slots.fill_with(Default::default);
        self.cellar_used = 0;
    }

    fn entry_at(&self, slot: usize, depth: usize) -> Option<(i64, &V)> {
        if depth > 0 {
            return None;
        }
        self.slots.get(slot)?.entry().map(|e| (e.key, &e.value))
    }
}

impl<V> HashTable<V, Coalesced<V>> {
    /// Creates a table with the default minimum capacity of 32.
    pub fn new() -> Self {
        Self::with_config(&TableConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&TableConfig::new().with_min_capacity(capacity))
    }

    pub fn with_config(config: &TableConfig) -> Self {
        let capacity = config.min_capacity.max(2);
        let store = Coalesced::new(capacity, config.cellar_ratio, config.salt);
        HashTable::from_placement(store, capacity)
    }
}

impl<V> Default for HashTable<V, Coalesced<V>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keys that share the home slot of `anchor`.
    fn chain_keys(table: &CoalescedTable<i64>, anchor: i64, count: usize) -> Vec<i64> {
        let store = table.placement();
        let home = store.home(anchor);
        (anchor..)
            .filter(|&k| store.home(k) == home)
            .take(count)
            .collect()
    }

    #[test]
    fn cellar_is_carved_out_of_capacity() {
        let table: CoalescedTable<u8> = CoalescedTable::new();
        let store = table.placement();
        assert_eq!(table.capacity(), 32);
        assert_eq!(store.cellar_len(), 4);
        assert_eq!(store.primary_len(), 28);
    }

    #[test]
    fn collisions_go_to_the_cellar() {
        let mut table = CoalescedTable::with_capacity(64);
        let keys = chain_keys(&table, 0, 3);
        for &k in &keys {
            table.set(k, k).unwrap();
        }
        let store = table.placement();
        let chain = store.chain(store.home(keys[0]));
        assert_eq!(chain.len(), 3);
        assert!(chain[1..].iter().all(|&i| i >= store.primary_len()));
        assert_eq!(store.cellar_used(), 2);
    }

    #[test]
    fn removing_head_promotes_next_entry() {
        let mut table = CoalescedTable::with_capacity(64);
        let keys = chain_keys(&table, 0, 4);
        for &k in &keys {
            table.set(k, k * 10).unwrap();
        }
        let home = table.placement().home(keys[0]);

        assert_eq!(table.remove(keys[0]), Ok(keys[0] * 10));
        let store = table.placement();
        assert_eq!(store.entry_at(home, 0).map(|e| e.0), Some(keys[1]));
        assert_eq!(store.chain(home).len(), 3);
        assert_eq!(store.cellar_used(), 2);
        for &k in &keys[1..] {
            assert_eq!(table.get(k), Ok(&(k * 10)));
        }
    }

    #[test]
    fn removing_interior_splices_chain() {
        let mut table = CoalescedTable::with_capacity(64);
        let keys = chain_keys(&table, 0, 4);
        for &k in &keys {
            table.set(k, k).unwrap();
        }

        assert_eq!(table.remove(keys[2]), Ok(keys[2]));
        let store = table.placement();
        assert_eq!(store.chain(store.home(keys[0])).len(), 3);
        assert!(!table.contains(keys[2]));
        for k in [keys[0], keys[1], keys[3]] {
            assert!(table.contains(k));
        }

        // the freed cellar slot is reused
        table.set(keys[2], -1).unwrap();
        assert_eq!(table.get(keys[2]), Ok(&-1));
        assert_eq!(table.placement().cellar_used(), 3);
    }

    #[test]
    fn full_cellar_forces_growth() {
        let mut table = CoalescedTable::with_capacity(64);
        let cellar = table.placement().cellar_len();
        let keys = chain_keys(&table, 0, cellar + 1);
        for &k in &keys {
            table.set(k, k).unwrap();
        }
        assert!(table.capacity() > 64);
        for &k in &keys {
            assert!(table.contains(k));
        }
        assert_eq!(table.len(), keys.len());
    }
}
