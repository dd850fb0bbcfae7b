//! # Direct-Access Table
//!
//! Keys must lie in a declared inclusive range `[lower, upper]`, and `key - lower` is the slot
//! index. There is one slot per possible key, so collisions cannot happen and the capacity
//! never changes.
//!
//! ```rust
//! use hash_tables::hashing::DirectAccessTable;
//!
//! let mut table = DirectAccessTable::new(10, 20).unwrap();
//! table.set(12, "twelve").unwrap();
//! assert_eq!(table.get(12), Ok(&"twelve"));
//! assert!(table.set(21, "too big").is_err());
//! ```

use super::slot::{drain_slots, empty_slots, Entry, Slot};
use super::table::{HashTable, Insertion, Placement};
use crate::error::{Error, Result};

/// Slot-per-key storage over a bounded key range.
#[derive(Debug, Clone)]
pub struct DirectAccess<V> {
    slots: Vec<Slot<V>>,
    lower: i64,
    upper: i64,
}

/// A direct-access table.
pub type DirectAccessTable<V> = HashTable<V, DirectAccess<V>>;

impl<V> DirectAccess<V> {
    /// Allocates one slot per key in `[lower, upper]`.
    pub fn new(lower: i64, upper: i64) -> Result<Self> {
        if lower > upper {
            return Err(Error::InvalidBounds { lower, upper });
        }
        let span = upper as i128 - lower as i128 + 1;
        let span = usize::try_from(span).map_err(|_| Error::InvalidBounds { lower, upper })?;
        Ok(DirectAccess {
            slots: empty_slots(span),
            lower,
            upper,
        })
    }

    pub fn bounds(&self) -> (i64, i64) {
        (self.lower, self.upper)
    }

    fn index(&self, key: i64) -> Result<usize> {
        if key < self.lower || key > self.upper {
            return Err(Error::OutOfRange {
                key,
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok((key as i128 - self.lower as i128) as usize)
    }
}

impl<V> Placement<V> for DirectAccess<V> {
    const NAME: &'static str = "direct-access";
    const RESIZABLE: bool = false;

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn rebuilt(&mut self, _capacity: usize) -> Self {
        DirectAccess {
            slots: empty_slots(self.slots.len()),
            lower: self.lower,
            upper: self.upper,
        }
    }

    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>> {
        let index = self.index(key)?;
        let slot = &mut self.slots[index];
        if let Some(entry) = slot.entry_mut() {
            return Ok(Insertion::Replaced(std::mem::replace(&mut entry.value, value)));
        }
        *slot = Slot::Occupied(Entry::new(key, value, ()));
        Ok(Insertion::Inserted)
    }

    fn try_lookup(&self, key: i64) -> Result<Option<&V>> {
        let index = self.index(key)?;
        Ok(self.slots[index].entry().map(|entry| &entry.value))
    }

    fn try_lookup_mut(&mut self, key: i64) -> Result<Option<&mut V>> {
        let index = self.index(key)?;
        Ok(self.slots[index].entry_mut().map(|entry| &mut entry.value))
    }

    fn try_remove(&mut self, key: i64) -> Result<Option<V>> {
        let index = self.index(key)?;
        Ok(self.slots[index].take().map(|entry| entry.value))
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
        self.slots
            .get(slot)?
            .entry()
            .map(|entry| (entry.key, &entry.value))
    }
}

impl<V> HashTable<V, DirectAccess<V>> {
    /// Creates a table accepting keys in `[lower, upper]`.
    pub fn new(lower: i64, upper: i64) -> Result<Self> {
        let store = DirectAccess::new(lower, upper)?;
        let capacity = store.slots.len();
        Ok(HashTable::from_placement(store, capacity))
    }
}
