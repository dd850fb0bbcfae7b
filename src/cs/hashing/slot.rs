//! # Backing Store Slots
//!
//! Every open-addressed variant stores its entries in a fixed `Vec` of [`Slot`]s. A slot is
//! always in exactly one of three states: `Empty`, `Occupied` or `Tombstone`. A tombstone is a
//! distinct state and never reads as empty, so probes walk past it.
//!
//! Strategy-specific bookkeeping rides along in [`Entry::meta`]: a chain link for coalesced
//! chaining, a probing distance for Robin Hood hashing, a home index for hopscotch hashing.

/// A stored key/value pair plus per-strategy metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V, M = ()> {
    pub key: i64,
    pub value: V,
    pub meta: M,
}

impl<V, M> Entry<V, M> {
    pub fn new(key: i64, value: V, meta: M) -> Self {
        Entry { key, value, meta }
    }

    pub fn into_pair(self) -> (i64, V) {
        (self.key, self.value)
    }
}

/// An entry can be `Empty`, `Tombstone` (used to be occupied but removed), or `Occupied`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<V, M = ()> {
    Empty,
    Occupied(Entry<V, M>),
    Tombstone,
}

impl<V, M> Default for Slot<V, M> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<V, M> Slot<V, M> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// True if the slot is occupied by `key`.
    pub fn holds(&self, key: i64) -> bool {
        matches!(self, Slot::Occupied(entry) if entry.key == key)
    }

    pub fn entry(&self) -> Option<&Entry<V, M>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn entry_mut(&mut self) -> Option<&mut Entry<V, M>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    /// Takes the entry out, leaving the slot `Empty`. Tombstones stay tombstones.
    pub fn take(&mut self) -> Option<Entry<V, M>> {
        match std::mem::take(self) {
            Slot::Occupied(entry) => Some(entry),
            other => {
                *self = other;
                None
            }
        }
    }

    /// Takes the entry out, leaving a `Tombstone` in its place.
    pub fn bury(&mut self) -> Option<Entry<V, M>> {
        match std::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(entry) => Some(entry),
            other => {
                *self = other;
                None
            }
        }
    }
}

/// Allocates `len` empty slots.
pub(crate) fn empty_slots<V, M>(len: usize) -> Vec<Slot<V, M>> {
    let mut slots = Vec::with_capacity(len);
    slots.resize_with(len, Default::default);
    slots
}

/// Moves every live entry out of `slots`, leaving all of them `Empty`.
pub(crate) fn drain_slots<V, M>(slots: &mut [Slot<V, M>]) -> Vec<(i64, V)> {
    let mut entries = Vec::new();
    for slot in slots.iter_mut() {
        if let Slot::Occupied(entry) = std::mem::take(slot) {
            entries.push(entry.into_pair());
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_distinct() {
        let empty: Slot<&str> = Slot::Empty;
        let tomb: Slot<&str> = Slot::Tombstone;
        let full = Slot::Occupied(Entry::new(3, "x", ()));

        assert!(empty.is_empty() && !empty.is_tombstone() && !empty.is_occupied());
        assert!(tomb.is_tombstone() && !tomb.is_empty());
        assert!(full.is_occupied() && full.holds(3) && !full.holds(4));
    }

    #[test]
    fn take_and_bury() {
        let mut slot = Slot::Occupied(Entry::new(1, 10, ()));
        assert_eq!(slot.take().map(Entry::into_pair), Some((1, 10)));
        assert!(slot.is_empty());

        let mut slot = Slot::Occupied(Entry::new(2, 20, ()));
        assert_eq!(slot.bury().map(|e| e.value), Some(20));
        assert!(slot.is_tombstone());
        // taking from a tombstone yields nothing and keeps the marker
        assert!(slot.take().is_none());
        assert!(slot.is_tombstone());
    }

    #[test]
    fn drain_empties_everything() {
        let mut slots: Vec<Slot<i32>> = empty_slots(4);
        slots[1] = Slot::Occupied(Entry::new(5, 50, ()));
        slots[2] = Slot::Tombstone;
        slots[3] = Slot::Occupied(Entry::new(7, 70, ()));

        let mut drained = drain_slots(&mut slots);
        drained.sort();
        assert_eq!(drained, vec![(5, 50), (7, 70)]);
        assert!(slots.iter().all(Slot::is_empty));
    }
}
