//! Fail-fast cursor over the raw slots of a `LinearProbeMap`.
//!
//! A `Cursor` does not borrow the map. Each step takes the map as an
//! argument and compares the map's structural generation against the
//! snapshot the cursor holds. Any structural change made through the map
//! itself (new key, removal, clear, rehash) between steps makes the next
//! step fail with `MapError::ConcurrentModification`; the map stays valid.
//!
//! `Cursor::remove` is the sanctioned way to delete while walking. It
//! resynchronizes the snapshot, so only outside mutation aborts the walk.
//! It never compacts, so positions seen so far stay meaningful; the map
//! applies its tombstone rule on the next `put` or `remove`.
//!
//! A cursor belongs to the map that created it. Driving it with another
//! map yields arbitrary slots or a generation mismatch, never UB.

use crate::error::{MapError, Result};
use crate::map::LinearProbeMap;
use crate::slot::SlotView;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Cursor {
    /// Next physical position to yield.
    pos: usize,
    /// Position yielded last, while it is still removable.
    current: Option<usize>,
    expected: u64,
}

impl Cursor {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            pos: 0,
            current: None,
            expected: generation,
        }
    }

    fn check<K, V, S>(&self, map: &LinearProbeMap<K, V, S>) -> Result<()> {
        if map.generation != self.expected {
            trace!(
                expected = self.expected,
                found = map.generation,
                "cursor invalidated"
            );
            return Err(MapError::ConcurrentModification {
                expected: self.expected,
                found: map.generation,
            });
        }
        Ok(())
    }

    /// Whether another slot remains. Does not check for modification.
    pub fn has_next<K, V, S>(&self, map: &LinearProbeMap<K, V, S>) -> bool {
        self.pos < map.capacity()
    }

    /// Index of the slot yielded last.
    pub fn position(&self) -> Option<usize> {
        self.pos.checked_sub(1)
    }

    /// Yield the next physical slot, including empty slots and tombstones.
    ///
    /// Returns `None` once every slot has been visited, and
    /// `Some(Err(ConcurrentModification))` on every call after an outside
    /// structural change; a failed cursor does not advance.
    pub fn next<'m, K, V, S>(
        &mut self,
        map: &'m LinearProbeMap<K, V, S>,
    ) -> Option<Result<SlotView<'m, K, V>>> {
        if let Err(e) = self.check(map) {
            self.current = None;
            return Some(Err(e));
        }
        let slot = map.buckets.slot(self.pos)?;
        self.current = Some(self.pos);
        self.pos += 1;
        Some(Ok(slot.view()))
    }

    /// Tombstone the slot yielded last if it holds a live entry and return
    /// its value. `Ok(None)` if nothing was yielded yet, the slot was not
    /// live, or it was already removed through this cursor.
    pub fn remove<K, V, S>(&mut self, map: &mut LinearProbeMap<K, V, S>) -> Result<Option<V>> {
        self.check(map)?;
        let Some(i) = self.current.take() else {
            return Ok(None);
        };
        let removed = map.remove_at(i);
        self.expected = map.generation;
        Ok(removed)
    }
}
