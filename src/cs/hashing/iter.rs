//! Enumeration over a table's live entries.
//!
//! The iterators are lazy linear scans over the backing store (descending into chains where a
//! variant has them). They borrow the table, so it cannot be mutated mid-scan, and
//! [`Iter::reset`] restarts a pass from the first slot.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::table::Placement;

/// Iterator over `(key, &value)` in slot order.
#[derive(Debug)]
pub struct Iter<'a, V, P> {
    store: &'a P,
    slot: usize,
    depth: usize,
    _marker: PhantomData<&'a V>,
}

impl<'a, V, P: Placement<V>> Iter<'a, V, P> {
    pub(crate) fn new(store: &'a P) -> Self {
        Iter {
            store,
            slot: 0,
            depth: 0,
            _marker: PhantomData,
        }
    }

    /// Rewinds to the first slot.
    pub fn reset(&mut self) {
        self.slot = 0;
        self.depth = 0;
    }
}

impl<V, P> Clone for Iter<'_, V, P> {
    fn clone(&self) -> Self {
        Iter {
            store: self.store,
            slot: self.slot,
            depth: self.depth,
            _marker: PhantomData,
        }
    }
}

impl<'a, V: 'a, P: Placement<V>> Iterator for Iter<'a, V, P> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let store: &'a P = self.store;
        while self.slot < store.slot_count() {
            if let Some(entry) = store.entry_at(self.slot, self.depth) {
                self.depth += 1;
                return Some(entry);
            }
            self.slot += 1;
            self.depth = 0;
        }
        None
    }
}

impl<'a, V: 'a, P: Placement<V>> FusedIterator for Iter<'a, V, P> {}

/// Iterator over keys in slot order.
#[derive(Debug)]
pub struct Keys<'a, V, P> {
    inner: Iter<'a, V, P>,
}

impl<V, P> Clone for Keys<'_, V, P> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, V, P: Placement<V>> Keys<'a, V, P> {
    pub(crate) fn new(inner: Iter<'a, V, P>) -> Self {
        Keys { inner }
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl<'a, V: 'a, P: Placement<V>> Iterator for Keys<'a, V, P> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.inner.next().map(|(key, _)| key)
    }
}

/// Iterator over values in slot order.
#[derive(Debug)]
pub struct Values<'a, V, P> {
    inner: Iter<'a, V, P>,
}

impl<V, P> Clone for Values<'_, V, P> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, V, P: Placement<V>> Values<'a, V, P> {
    pub(crate) fn new(inner: Iter<'a, V, P>) -> Self {
        Values { inner }
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl<'a, V: 'a, P: Placement<V>> Iterator for Values<'a, V, P> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use crate::hashing::{DirectAccessTable, SeparateChainingTable};

    #[test]
    fn slot_order_and_restart() {
        let mut table = DirectAccessTable::new(0, 9).unwrap();
        for key in [7, 2, 5] {
            table.set(key, key * 10).unwrap();
        }
        let mut iter = table.iter();
        assert_eq!(iter.next(), Some((2, &20)));
        assert_eq!(iter.next(), Some((5, &50)));
        assert_eq!(iter.next(), Some((7, &70)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);

        iter.reset();
        assert_eq!(iter.next(), Some((2, &20)));
    }

    #[test]
    fn clones_advance_independently() {
        let mut table = DirectAccessTable::new(1, 4).unwrap();
        table.set_all((1..=4).map(|k| (k, k))).unwrap();
        let mut keys = table.keys();
        keys.next();
        let rest: Vec<i64> = keys.clone().collect();
        assert_eq!(rest, vec![2, 3, 4]);
        assert_eq!(keys.next(), Some(2));
    }

    #[test]
    fn descends_into_chains() {
        // two buckets, so at least one chain holds several entries
        let mut table = SeparateChainingTable::with_capacity(2);
        table.set_all((0..5).map(|k| (k, k))).unwrap();
        let mut keys: Vec<i64> = table.keys().collect();
        keys.sort();
        assert_eq!(keys, vec![0, 1, 2, 3, 4]);

        let mut values = table.values();
        assert_eq!(values.by_ref().sum::<i64>(), 10);
        values.reset();
        assert_eq!(values.count(), 5);
    }
}
