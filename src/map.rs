//! LinearProbeMap: controller that owns the buckets, keeps the counts, and
//! decides when to grow or compact.

use crate::buckets::Buckets;
use crate::cursor::Cursor;
use crate::error::{MapError, Result};
use crate::guard::ProbeGuard;
use crate::iter::{Iter, IterMut, Keys, Values};
use crate::prime::next_prime;
use crate::probe::{self, Probe};
use crate::slot::Slot;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::{HashMap, HashSet};
use std::collections::hash_map::RandomState;
use tracing::{debug, trace};

/// Slot count of a freshly constructed map. Prime.
pub const INITIAL_CAPACITY: usize = 5;

/// Maximum load factor used by `new()` and `Default`.
pub const DEFAULT_MAX_LOAD: f32 = 0.7;

/// Open-addressing hash map with linear probing and tombstone deletion.
///
/// - `put` grows the bucket array to the next prime `>= 2 * capacity + 1`
///   before a new key would push the load past `max_load`.
/// - `remove` leaves a tombstone; once tombstones outnumber live entries the
///   array is repacked at the same capacity.
/// - `cursor()` walks raw slots and fails fast on outside modification.
pub struct LinearProbeMap<K, V, S = RandomState> {
    hasher: S,
    pub(crate) buckets: Buckets<K, V>,
    len: usize,
    tombstones: usize,
    max_load: f32,
    /// Bumped on every structural change; cursors compare against it.
    pub(crate) generation: u64,
    guard: ProbeGuard,
}

impl<K, V> LinearProbeMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_max_load(max_load: f32) -> Result<Self> {
        Self::with_max_load_and_hasher(max_load, Default::default())
    }
}

impl<K, V> Default for LinearProbeMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> LinearProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::build(DEFAULT_MAX_LOAD, hasher)
    }

    /// Fails with `InvalidMaxLoad` unless `0 < max_load <= 1`.
    pub fn with_max_load_and_hasher(max_load: f32, hasher: S) -> Result<Self> {
        if !(max_load > 0.0 && max_load <= 1.0) {
            return Err(MapError::InvalidMaxLoad(max_load));
        }
        Ok(Self::build(max_load, hasher))
    }

    fn build(max_load: f32, hasher: S) -> Self {
        Self {
            hasher,
            buckets: Buckets::with_capacity(INITIAL_CAPACITY),
            len: 0,
            tombstones: 0,
            max_load,
            generation: 0,
            guard: ProbeGuard::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Hash `q` and walk its probe sequence. The only place user
    /// `Hash`/`Eq` code runs.
    fn locate<Q>(&self, q: &Q) -> (u64, Probe)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter();
        let hash = self.make_hash(q);
        (hash, probe::find(&self.buckets, hash, q))
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.locate(q).1 {
            Probe::Hit(i) => self.buckets.value(i),
            Probe::Miss { .. } => None,
        }
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.locate(q).1 {
            Probe::Hit(i) => self.buckets.value_mut(i),
            Probe::Miss { .. } => None,
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        matches!(self.locate(q).1, Probe::Hit(_))
    }

    /// Insert or overwrite. Returns the previous value only when the key
    /// had a live entry; a key that is merely tombstoned yields `None`.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.len < self.tombstones {
            self.compact();
        }

        let (hash, vacancy) = match self.locate(&key) {
            (_, Probe::Hit(i)) => return self.buckets.replace_value(i, value),
            (hash, Probe::Miss { vacancy }) => (hash, vacancy),
        };

        let vacancy = if self.would_exceed_max_load(self.len + 1) {
            while self.would_exceed_max_load(self.len + 1) {
                self.grow();
            }
            probe::first_empty(&self.buckets, hash)
        } else {
            vacancy
        };

        let i = vacancy.unwrap_or_else(|| {
            panic!(
                "no free slot for a new key below max load (len {}, tombstones {}, capacity {})",
                self.len,
                self.tombstones,
                self.capacity()
            )
        });
        if self.buckets.occupy(i, key, value, hash) {
            self.tombstones -= 1;
        }
        self.len += 1;
        self.generation += 1;
        None
    }

    /// Tombstone the entry for `q` and return its value.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let removed = match self.locate(q).1 {
            Probe::Hit(i) => self.remove_at(i),
            Probe::Miss { .. } => None,
        };
        if self.len < self.tombstones {
            self.compact();
        }
        removed
    }

    /// Repack every live entry into `capacity` slots.
    ///
    /// Fails with `CapacityTooSmall` if `capacity` is zero or below `len()`.
    pub fn rehash(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 || capacity < self.len {
            return Err(MapError::CapacityTooSmall {
                requested: capacity,
                len: self.len,
            });
        }
        trace!(
            from = self.capacity(),
            to = capacity,
            len = self.len,
            tombstones = self.tombstones,
            "explicit rehash"
        );
        self.rehash_to(capacity);
        Ok(())
    }

    // Compared as `len > max_load * capacity` in f64: an f32 ratio rounds
    // `len` and `capacity` together once they pass 2^24.
    fn would_exceed_max_load(&self, len: usize) -> bool {
        len as f64 > f64::from(self.max_load) * self.capacity() as f64
    }

    fn grow(&mut self) {
        let bound = self
            .capacity()
            .checked_mul(2)
            .and_then(|c| c.checked_add(1))
            .expect("capacity overflow");
        let capacity = next_prime(bound);
        debug!(
            from = self.capacity(),
            to = capacity,
            len = self.len,
            max_load = self.max_load,
            "growing bucket array"
        );
        self.rehash_to(capacity);
    }

    fn compact(&mut self) {
        debug!(
            capacity = self.capacity(),
            len = self.len,
            tombstones = self.tombstones,
            "compacting tombstones"
        );
        self.rehash_to(self.capacity());
    }
}

impl<K, V, S> LinearProbeMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slot count.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// Number of tombstones currently in the array.
    pub fn ghosts(&self) -> usize {
        self.tombstones
    }

    /// Live entries divided by capacity.
    pub fn load(&self) -> f32 {
        (self.len as f64 / self.capacity() as f64) as f32
    }

    pub fn max_load(&self) -> f32 {
        self.max_load
    }

    /// Drop every entry and tombstone. Capacity is kept.
    pub fn clear(&mut self) {
        self.buckets = Buckets::with_capacity(self.capacity());
        self.len = 0;
        self.tombstones = 0;
        self.generation += 1;
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values_iter().any(|v| v == value)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.buckets.slots(), self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.buckets.slots_mut(), self.len)
    }

    pub fn keys_iter(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values_iter(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Snapshot of the live keys.
    pub fn keys(&self) -> HashSet<&K>
    where
        K: Hash + Eq,
    {
        self.keys_iter().collect()
    }

    /// Snapshot of the live values, in slot order.
    pub fn values(&self) -> Vec<&V> {
        self.values_iter().collect()
    }

    /// Snapshot of the live entries.
    pub fn entries(&self) -> HashMap<&K, &V>
    where
        K: Hash + Eq,
    {
        self.iter().collect()
    }

    /// Fail-fast cursor over raw slot positions. See [`Cursor`].
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.generation)
    }

    /// Tombstone slot `i` if it is live. Never compacts, so slot positions
    /// stay put for an in-flight cursor.
    pub(crate) fn remove_at(&mut self, i: usize) -> Option<V> {
        let value = self.buckets.bury(i)?;
        self.len -= 1;
        self.tombstones += 1;
        self.generation += 1;
        Some(value)
    }

    /// Move live entries into a fresh array of `capacity` slots using their
    /// stored hashes, then swap it in.
    fn rehash_to(&mut self, capacity: usize) {
        let mut fresh = Buckets::with_capacity(capacity);
        let old = core::mem::replace(&mut self.buckets, Buckets::with_capacity(0));
        for slot in old.into_slots() {
            if let Slot::Occupied { key, value, hash } = slot {
                let i = probe::first_empty(&fresh, hash)
                    .expect("rehash target must have room for every live entry");
                fresh.occupy(i, key, value, hash);
            }
        }
        self.buckets = fresh;
        self.tombstones = 0;
        self.generation += 1;
    }
}

impl<K, V, S> fmt::Debug for LinearProbeMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinearProbeMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinearProbeMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> Extend<(K, V)> for LinearProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinearProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}
