//! probe-map: a single-threaded open-addressing hash map with linear
//! probing, tombstone deletion, prime-sized growth, and a fail-fast cursor.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep each layer small enough that its invariants fit on a page.
//! - Layers (leaves first):
//!   - `Slot<K, V>`: tagged cell, `Empty` / `Occupied` / `Tombstone`. Live
//!     and dead slots both keep the hash computed at insert time.
//!   - `Buckets<K, V>`: fixed-length boxed slice of slots. Never resized
//!     in place; growth and compaction build a new one and swap it in.
//!   - `probe`: the one linear-probing walk shared by lookup, insertion,
//!     deletion, and rehash. Every walk is bounded by the capacity.
//!   - `LinearProbeMap<K, V, S>`: owns the buckets and the counters
//!     (`len`, `tombstones`, `generation`), applies the growth and
//!     compaction rules, and exposes the map API.
//!   - `Cursor`: raw slot walk that fails fast on outside structural change
//!     and supports removal of the slot it last produced.
//!
//! Growth and compaction
//! - Before a new key is placed, if `(len + 1) / capacity > max_load` the
//!   array grows to `next_prime(2 * capacity + 1)`, repeated until the
//!   bound holds. Overwriting an existing key never grows.
//! - Whenever live entries are outnumbered by tombstones at the start of a
//!   `put` or the end of a `remove`, the array is repacked at the same
//!   capacity and every tombstone disappears.
//! - Rehashing uses stored hashes; `K: Hash` runs once per key, at insert.
//!
//! Home index
//! - `abs(hash as i64) mod capacity`, computed with `unsigned_abs` so the
//!   minimum `i64` does not overflow.
//!
//! Tombstones
//! - A new key lands in the first tombstone or empty slot on its path.
//! - A probe that meets a tombstone holding the same key stops there: no
//!   live copy of that key can sit further along. Re-inserting that key
//!   reclaims its own tombstone, so a key never fills two non-empty slots.
//!
//! Iteration
//! - `iter()`, `keys_iter()`, `values_iter()` borrow the map and see live
//!   entries only.
//! - `cursor()` returns a `Cursor` that holds no borrow. It yields every
//!   physical slot as a `SlotView` and compares a generation snapshot on
//!   each step. Removing through the cursor resynchronizes the snapshot.
//!
//! Reentrancy
//! - Probing is the only place user code (`K: Hash`, `K: Eq`) runs. A
//!   debug-only guard panics if that code calls back into the same map.
//!
//! Notes and non-goals
//! - Single-threaded: the map is `!Sync`; mutation needs `&mut self`.
//! - No persistence or serialization.
//! - `put` is amortized O(1) with an O(capacity) worst case when it grows.

mod buckets;
mod cursor;
mod error;
mod guard;
mod iter;
mod map;
mod map_proptest;
mod prime;
mod probe;
mod slot;

// Public surface
pub use cursor::Cursor;
pub use error::{MapError, Result};
pub use iter::{Iter, IterMut, Keys, Values};
pub use map::{LinearProbeMap, DEFAULT_MAX_LOAD, INITIAL_CAPACITY};
pub use prime::{is_prime, next_prime};
pub use slot::SlotView;
