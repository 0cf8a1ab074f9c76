//! Buckets: the fixed-size slot array behind a `LinearProbeMap`.
//!
//! A `Buckets` never changes length. Growth and compaction build a fresh
//! one and swap it in.

use crate::slot::Slot;

pub(crate) struct Buckets<K, V> {
    slots: Box<[Slot<K, V>]>,
}

impl<K, V> Buckets<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn slot(&self, i: usize) -> Option<&Slot<K, V>> {
        self.slots.get(i)
    }

    pub(crate) fn value(&self, i: usize) -> Option<&V> {
        match self.slots.get(i)? {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub(crate) fn value_mut(&mut self, i: usize) -> Option<&mut V> {
        match self.slots.get_mut(i)? {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Overwrite the value of a live slot, returning the old one.
    pub(crate) fn replace_value(&mut self, i: usize, value: V) -> Option<V> {
        self.value_mut(i).map(|v| core::mem::replace(v, value))
    }

    /// Store a live entry at `i`. Returns true if a tombstone was reclaimed.
    pub(crate) fn occupy(&mut self, i: usize, key: K, value: V, hash: u64) -> bool {
        let prev = core::mem::replace(&mut self.slots[i], Slot::Occupied { key, value, hash });
        debug_assert!(!prev.is_live(), "occupy() would overwrite a live entry");
        matches!(prev, Slot::Tombstone { .. })
    }

    /// Tombstone the live slot at `i`.
    pub(crate) fn bury(&mut self, i: usize) -> Option<V> {
        self.slots.get_mut(i)?.bury()
    }

    pub(crate) fn slots(&self) -> core::slice::Iter<'_, Slot<K, V>> {
        self.slots.iter()
    }

    pub(crate) fn slots_mut(&mut self) -> core::slice::IterMut<'_, Slot<K, V>> {
        self.slots.iter_mut()
    }

    pub(crate) fn into_slots(self) -> impl Iterator<Item = Slot<K, V>> {
        self.slots.into_vec().into_iter()
    }
}
