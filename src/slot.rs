//! Slot: the three-state cell stored in the bucket array.

/// One physical position of the bucket array.
///
/// Non-empty slots keep the hash computed at insert time so that rehashing
/// never calls back into `K: Hash`.
#[derive(Debug, Clone)]
pub(crate) enum Slot<K, V> {
    Empty,
    Occupied { key: K, value: V, hash: u64 },
    /// Deleted entry. The key stays for cursor bookkeeping only; lookups
    /// treat it as absent.
    Tombstone { key: K, hash: u64 },
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Turn a live slot into a tombstone and hand back its value.
    /// Returns `None` and leaves the slot untouched otherwise.
    pub(crate) fn bury(&mut self) -> Option<V> {
        if !self.is_live() {
            return None;
        }
        match core::mem::take(self) {
            Slot::Occupied { key, value, hash } => {
                *self = Slot::Tombstone { key, hash };
                Some(value)
            }
            _ => unreachable!("slot checked live above"),
        }
    }

    pub(crate) fn view(&self) -> SlotView<'_, K, V> {
        match self {
            Slot::Empty => SlotView::Empty,
            Slot::Occupied { key, value, .. } => SlotView::Occupied(key, value),
            Slot::Tombstone { key, .. } => SlotView::Tombstone(key),
        }
    }
}

/// Borrowed view of a physical slot, as produced by `Cursor::next`.
#[derive(Debug, PartialEq, Eq)]
pub enum SlotView<'a, K, V> {
    Empty,
    Occupied(&'a K, &'a V),
    Tombstone(&'a K),
}

// Manual impls: a derive would demand `K: Copy, V: Copy`.
impl<'a, K, V> Clone for SlotView<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for SlotView<'a, K, V> {}

impl<'a, K, V> SlotView<'a, K, V> {
    /// The live entry, if any. Cursor consumers use this to skip holes.
    pub fn live(self) -> Option<(&'a K, &'a V)> {
        match self {
            SlotView::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SlotView::Empty)
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, SlotView::Tombstone(_))
    }
}
