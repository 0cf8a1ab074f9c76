//! Linear probing over a `Buckets` array.
//!
//! Lookup, insertion, deletion, and rehash all walk the same sequence:
//! `(home + p) mod capacity` for `p = 0, 1, ..`, where `home` is the
//! absolute value of the hash (read as `i64`) modulo capacity. Every walk
//! stops after `capacity` steps, so a saturated array cannot hang a caller.

use crate::buckets::Buckets;
use crate::slot::Slot;
use core::borrow::Borrow;

/// Outcome of searching for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// Live entry with an equal key at this index.
    Hit(usize),
    /// Key absent. `vacancy` is where an insert of that key belongs: the
    /// key's own tombstone if there is one, else the first hole on its path.
    Miss { vacancy: Option<usize> },
}

/// `abs(hash) mod capacity`. `unsigned_abs` maps `i64::MIN` to `2^63`
/// instead of overflowing.
#[inline]
pub(crate) fn home_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    ((hash as i64).unsigned_abs() % capacity as u64) as usize
}

/// Probe positions for `hash`, bounded to one lap of the array.
#[inline]
fn sequence(hash: u64, capacity: usize) -> impl Iterator<Item = usize> {
    let home = if capacity == 0 {
        0
    } else {
        home_index(hash, capacity)
    };
    (0..capacity).map(move |p| {
        let i = home + p;
        if i >= capacity {
            i - capacity
        } else {
            i
        }
    })
}

/// Search for `q`.
///
/// A tombstone holding an equal key ends the search as a miss whose
/// vacancy is that tombstone, so a re-inserted key takes back its old slot
/// and a key never occupies two non-empty slots. No live copy of the key
/// can sit past its own tombstone: slots only become empty through a
/// rehash or clear, both of which drop every tombstone.
pub(crate) fn find<K, V, Q>(buckets: &Buckets<K, V>, hash: u64, q: &Q) -> Probe
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    let mut first_hole = None;
    for i in sequence(hash, buckets.capacity()) {
        match buckets.slot(i) {
            None | Some(Slot::Empty) => {
                return Probe::Miss {
                    vacancy: first_hole.or(Some(i)),
                }
            }
            Some(Slot::Occupied { key, hash: h, .. }) => {
                if *h == hash && key.borrow() == q {
                    return Probe::Hit(i);
                }
            }
            Some(Slot::Tombstone { key, hash: h }) => {
                if *h == hash && key.borrow() == q {
                    return Probe::Miss { vacancy: Some(i) };
                }
                first_hole.get_or_insert(i);
            }
        }
    }
    Probe::Miss {
        vacancy: first_hole,
    }
}

/// First empty slot on the path of `hash`; used when repacking into a
/// fresh array, which holds no tombstones and no duplicate keys.
pub(crate) fn first_empty<K, V>(buckets: &Buckets<K, V>, hash: u64) -> Option<usize> {
    sequence(hash, buckets.capacity()).find(|&i| matches!(buckets.slot(i), Some(Slot::Empty)))
}
