//! # Shared Table Contract and Resize Policy
//!
//! Every variant is a [`HashTable`] parameterized by a [`Placement`] strategy. The strategy owns
//! the backing store and its collision-resolution algorithm; the table owns the logical size,
//! the minimum capacity and the resize policy, which it applies identically to every
//! growth-capable strategy:
//!
//! - **Grow** when `2 * len + 1 > capacity`.
//! - **Shrink** when `len < capacity / 8` while `capacity > min_capacity`.
//! - The new capacity is the smallest power of two `>= 3 * len`, floored at `min_capacity`.
//!
//! A rebuild allocates a fresh store and re-inserts every live entry through the strategy's own
//! insertion path, so probe distances, neighborhoods and chains are re-established from scratch.
//!
//! Strategies may also hand entries back as [`Insertion::Full`] (no room at this capacity) or
//! request a rebuild through [`Placement::needs_rebuild`] (tombstone build-up, cellar
//! saturation). The table answers both by rebuilding.

use std::marker::PhantomData;

use log::{debug, error, warn};

use super::iter::{Iter, Keys, Values};
use crate::error::{Error, Result};

/// Upper bound on consecutive growth attempts while rebuilding.
const MAX_REBUILD_ATTEMPTS: usize = 32;

/// Outcome of a single [`Placement::try_insert`].
#[derive(Debug, PartialEq, Eq)]
pub enum Insertion<V> {
    /// The key was new and now occupies a slot.
    Inserted,
    /// The key was present; this is its previous value.
    Replaced(V),
    /// The key was new and took a slot held by a different key, which is gone.
    /// Only strategies without collision handling produce this.
    Evicted { key: i64, value: V },
    /// The strategy ran out of room at this capacity. These entries are not stored.
    Full(Vec<(i64, V)>),
}

/// A rebuild a strategy asks for after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebuild {
    /// Rebuild at the current capacity.
    Refresh,
    /// Rebuild at double the current capacity.
    Grow,
}

/// The collision-resolution capability set of one table variant.
pub trait Placement<V>: Sized {
    /// Human-readable name, used in log output.
    const NAME: &'static str;

    /// Whether the resize policy applies.
    const RESIZABLE: bool = true;

    /// Total slot count of the backing store.
    fn capacity(&self) -> usize;

    /// The slot count the load factor is measured against.
    fn load_capacity(&self) -> usize {
        self.capacity()
    }

    /// An empty store with the same parameters and the given capacity.
    fn rebuilt(&mut self, capacity: usize) -> Self;

    /// Inserts or overwrites `key`.
    fn try_insert(&mut self, key: i64, value: V) -> Result<Insertion<V>>;

    /// Finds `key` with the strategy's own lookup procedure.
    fn try_lookup(&self, key: i64) -> Result<Option<&V>>;

    /// Mutable counterpart of [`Placement::try_lookup`].
    fn try_lookup_mut(&mut self, key: i64) -> Result<Option<&mut V>>;

    /// Removes `key`, restoring the strategy's invariants.
    fn try_remove(&mut self, key: i64) -> Result<Option<V>>;

    /// Called after every mutation.
    fn needs_rebuild(&self) -> Option<Rebuild> {
        None
    }

    /// Moves every live entry out, leaving the store empty.
    fn drain(&mut self) -> Vec<(i64, V)>;

    /// Empties the store in place.
    fn clear(&mut self);

    /// Number of addressable slots for enumeration.
    fn slot_count(&self) -> usize {
        self.capacity()
    }

    /// The `depth`-th live entry stored at `slot`. Only chaining variants have depth > 0.
    fn entry_at(&self, slot: usize, depth: usize) -> Option<(i64, &V)>;
}

/// An integer-keyed hash table over a placement strategy.
#[derive(Debug)]
pub struct HashTable<V, P: Placement<V>> {
    store: P,
    len: usize,
    min_capacity: usize,
    _marker: PhantomData<V>,
}

impl<V, P: Placement<V>> HashTable<V, P> {
    /// Wraps an empty store. `min_capacity` is the shrink floor.
    pub fn from_placement(store: P, min_capacity: usize) -> Self {
        HashTable {
            store,
            len: 0,
            min_capacity,
            _marker: PhantomData,
        }
    }

    /// Returns the number of key-value pairs in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// `len / capacity`, measured against the region that holds home slots.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.store.load_capacity() as f64
    }

    /// Read-only access to the backing strategy.
    pub fn placement(&self) -> &P {
        &self.store
    }

    /// Inserts a key-value pair, returning the old value if the key was present.
    /// May trigger a resize.
    pub fn set(&mut self, key: i64, value: V) -> Result<Option<V>> {
        match self.store.try_insert(key, value)? {
            Insertion::Replaced(old) => return Ok(Some(old)),
            Insertion::Evicted { key: evicted, .. } => {
                debug!("{}: key {} evicted colliding key {}", P::NAME, key, evicted);
                return Ok(None);
            }
            Insertion::Inserted => {}
            Insertion::Full(homeless) => {
                let capacity = self.capacity().saturating_mul(2);
                warn!(
                    "{}: no room for key {} at capacity {}, growing to {}",
                    P::NAME,
                    key,
                    self.capacity(),
                    capacity
                );
                self.rebuild(capacity, homeless)?;
            }
        }
        self.len += 1;
        self.after_size_change()?;
        Ok(None)
    }

    /// Inserts every pair in order, stopping at the first error.
    pub fn set_all<I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (i64, V)>,
    {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Returns a reference to the value stored for `key`.
    pub fn get(&self, key: i64) -> Result<&V> {
        self.store.try_lookup(key)?.ok_or(Error::KeyNotFound(key))
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: i64) -> Result<&mut V> {
        self.store.try_lookup_mut(key)?.ok_or(Error::KeyNotFound(key))
    }

    /// Removes `key` and returns its value. May trigger a resize.
    pub fn remove(&mut self, key: i64) -> Result<V> {
        let value = self
            .store
            .try_remove(key)?
            .ok_or(Error::KeyNotFound(key))?;
        self.len -= 1;
        self.after_size_change()?;
        Ok(value)
    }

    /// True if `key` is stored. Never fails; out-of-range keys are simply absent.
    pub fn contains(&self, key: i64) -> bool {
        matches!(self.store.try_lookup(key), Ok(Some(_)))
    }

    /// Removes everything. Growth-capable tables drop back to their minimum capacity.
    pub fn clear(&mut self) {
        if P::RESIZABLE && self.store.capacity() != self.min_capacity {
            self.store = self.store.rebuilt(self.min_capacity);
        } else {
            self.store.clear();
        }
        self.len = 0;
    }

    /// Enumerates `(key, &value)` in slot order.
    pub fn iter(&self) -> Iter<'_, V, P> {
        Iter::new(&self.store)
    }

    pub fn keys(&self) -> Keys<'_, V, P> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, V, P> {
        Values::new(self.iter())
    }

    /// Capacity the resize policy wants, if it differs from the current one.
    fn resize_target(&self) -> Option<usize> {
        if !P::RESIZABLE {
            return None;
        }
        let load_capacity = self.store.load_capacity();
        let grow = 2 * self.len + 1 > load_capacity;
        let capacity = self.store.capacity();
        let shrink = self.len * 8 < capacity && capacity > self.min_capacity;
        if !grow && !shrink {
            return None;
        }
        let target = (3 * self.len).next_power_of_two().max(self.min_capacity);
        (target != capacity).then_some(target)
    }

    fn after_size_change(&mut self) -> Result<()> {
        if let Some(capacity) = self.resize_target() {
            self.rebuild(capacity, Vec::new())?;
        }
        match self.store.needs_rebuild() {
            Some(Rebuild::Refresh) => {
                debug!("{}: purging at capacity {}", P::NAME, self.capacity());
                self.rebuild(self.capacity(), Vec::new())
            }
            Some(Rebuild::Grow) => {
                let capacity = self.capacity().saturating_mul(2);
                debug!("{}: overflow region saturated, growing to {}", P::NAME, capacity);
                self.rebuild(capacity, Vec::new())
            }
            None => Ok(()),
        }
    }

    /// Replaces the store with a fresh one of `capacity` slots holding every live entry plus
    /// `pending`. Doubles and retries if the fresh store cannot hold them all.
    ///
    /// On failure the live entries are put back at the old capacity and `len` is recounted, so
    /// the table stays consistent even though the error is fatal.
    fn rebuild(&mut self, mut capacity: usize, mut pending: Vec<(i64, V)>) -> Result<()> {
        let old_capacity = self.store.capacity();
        let incoming: Vec<i64> = pending.iter().map(|&(key, _)| key).collect();
        pending.extend(self.store.drain());
        let live = pending.len();

        for _ in 0..MAX_REBUILD_ATTEMPTS {
            let mut fresh = self.store.rebuilt(capacity);
            let leftover = Self::place_all(&mut fresh, &mut pending)?;
            if leftover.is_none() && fresh.needs_rebuild().is_none() {
                debug!(
                    "{}: rebuilt {} -> {} slots with {} live entries",
                    P::NAME,
                    old_capacity,
                    capacity,
                    live
                );
                self.store = fresh;
                return Ok(());
            }
            if let Some(mut homeless) = leftover {
                pending.append(&mut homeless);
            }
            pending.extend(fresh.drain());
            capacity = capacity.saturating_mul(2);
            warn!("{}: rebuild overflowed, retrying at {} slots", P::NAME, capacity);
        }
        self.restore(old_capacity, pending, &incoming);
        Err(Error::InvariantViolation("rebuild could not place every live entry"))
    }

    /// Re-inserts `entries` into a store of `capacity` slots, entries that were already live
    /// first. Whatever still does not fit is dropped and `len` is recounted.
    fn restore(&mut self, capacity: usize, entries: Vec<(i64, V)>, incoming: &[i64]) {
        let (new, old): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|(key, _)| incoming.contains(key));
        let attempted = old.len() + new.len();

        let mut store = self.store.rebuilt(capacity);
        for (key, value) in old.into_iter().chain(new) {
            // a failed insert drops the entry; the recount below reflects it
            let _ = store.try_insert(key, value);
        }
        self.store = store;
        self.len = self.iter().count();
        error!(
            "{}: rebuild failed, restored {} of {} entries at {} slots",
            P::NAME,
            self.len,
            attempted,
            capacity
        );
    }

    /// Inserts everything in `pending` into `store`. Returns what did not fit.
    fn place_all(store: &mut P, pending: &mut Vec<(i64, V)>) -> Result<Option<Vec<(i64, V)>>> {
        while let Some((key, value)) = pending.pop() {
            match store.try_insert(key, value)? {
                Insertion::Inserted => {}
                Insertion::Full(homeless) => return Ok(Some(homeless)),
                Insertion::Replaced(_) | Insertion::Evicted { .. } => {
                    return Err(Error::InvariantViolation("duplicate key while rebuilding"));
                }
            }
        }
        Ok(None)
    }
}

impl<'a, V, P: Placement<V>> IntoIterator for &'a HashTable<V, P> {
    type Item = (i64, &'a V);
    type IntoIter = Iter<'a, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
