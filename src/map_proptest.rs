#![cfg(test)]

// Property tests for LinearProbeMap kept inside the crate so they can
// inspect the bucket array directly.

use crate::map::LinearProbeMap;
use crate::prime::is_prime;
use crate::slot::Slot;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, pool length
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    ContainsValue(i32),
    Mutate(usize, i32),
    /// Rehash to `len + extra` slots.
    Rehash(usize),
    /// Walk with a cursor and remove the nth live entry seen.
    CursorRemove(usize),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (-3i32..3).prop_map(OpI::ContainsValue),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (0usize..8).prop_map(OpI::Rehash),
            1 => (0usize..8).prop_map(OpI::CursorRemove),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Slot-level invariants that must hold after every operation.
fn check_layout<S>(sut: &LinearProbeMap<Key, i32, S>) -> Result<(), TestCaseError> {
    let mut live = 0usize;
    let mut dead = 0usize;
    let mut seen: HashSet<&Key> = HashSet::new();
    for slot in sut.buckets.slots() {
        match slot {
            Slot::Empty => {}
            Slot::Occupied { key, .. } => {
                live += 1;
                prop_assert!(seen.insert(key), "key {:?} in two slots", key);
            }
            Slot::Tombstone { key, .. } => {
                dead += 1;
                prop_assert!(seen.insert(key), "key {:?} in two slots", key);
            }
        }
    }
    prop_assert_eq!(live, sut.len());
    prop_assert_eq!(dead, sut.ghosts());
    prop_assert!(sut.len() + sut.ghosts() <= sut.capacity());
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - put returns the previous live value; get/contains_key agree with the model.
// - remove returns the model's value and bumps ghosts by exactly one.
// - a new key never leaves load above max_load; growth lands on a prime
//   >= 2 * old capacity + 1.
// - after put/remove, tombstones never outnumber live entries.
// - every key fills at most one non-empty slot; counters match the slots.
fn run_scenario<S>(
    mut sut: LinearProbeMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = key_from(&pool, i);
                let cap_before = sut.capacity();
                let is_new = !model.contains_key(&k);
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                prop_assert_eq!(sut.get(&k), Some(&v));
                if is_new {
                    prop_assert!(sut.load() <= sut.max_load());
                }
                if sut.capacity() > cap_before {
                    prop_assert!(is_prime(sut.capacity()));
                    prop_assert!(sut.capacity() >= 2 * cap_before + 1);
                }
                prop_assert!(sut.ghosts() <= sut.len());
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                let ghosts_before = sut.ghosts();
                let removed = sut.remove(&k);
                prop_assert_eq!(removed, model.remove(&k));
                if removed.is_some() && sut.ghosts() != 0 {
                    prop_assert_eq!(sut.ghosts(), ghosts_before + 1);
                }
                prop_assert!(sut.get(&k).is_none());
                prop_assert!(sut.ghosts() <= sut.len());
            }
            OpI::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|&mv| mv == v));
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                match (sut.get_mut(k.0.as_str()), model.get_mut(&k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    _ => {
                        prop_assert!(false, "get_mut disagrees with model");
                    }
                }
            }
            OpI::Rehash(extra) => {
                let target = sut.len() + extra;
                if target == 0 {
                    prop_assert!(sut.rehash(0).is_err());
                } else {
                    sut.rehash(target).expect("capacity >= len");
                    prop_assert_eq!(sut.capacity(), target);
                    prop_assert_eq!(sut.ghosts(), 0);
                }
            }
            OpI::CursorRemove(nth) => {
                let mut c = sut.cursor();
                let mut live_seen = 0usize;
                let mut victim = None;
                while let Some(step) = c.next(&sut) {
                    let view = step.expect("no outside mutation");
                    if let Some((k, _)) = view.live() {
                        if live_seen == nth {
                            victim = Some(k.clone());
                            break;
                        }
                        live_seen += 1;
                    }
                }
                if let Some(k) = victim {
                    let v = c.remove(&mut sut).expect("cursor still in sync");
                    prop_assert_eq!(v, model.remove(&k));
                    prop_assert!(!sut.contains_key(&k));
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.ghosts(), 0);
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.keys_iter().cloned().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(&s_keys, &m_keys);
                prop_assert_eq!(sut.keys().len(), m_keys.len());
                prop_assert_eq!(sut.values().len(), model.len());
                for (k, v) in sut.entries() {
                    prop_assert_eq!(model.get(k), Some(v));
                }
            }
        }

        check_layout(&sut)?;
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), max_load in 0.1f32..=1.0) {
        let sut = LinearProbeMap::with_max_load(max_load).unwrap();
        run_scenario(sut, pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, under worst-case
// collision behavior. Every key shares home index 0, so probes walk long
// runs of live entries and tombstones.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), max_load in 0.1f32..=1.0) {
        let sut = LinearProbeMap::with_max_load_and_hasher(max_load, ConstBuildHasher).unwrap();
        run_scenario(sut, pool, ops)?;
    }
}

// Property: a fresh key probing into a full table still terminates and
// triggers growth at max_load = 1.0.
proptest! {
    #[test]
    fn prop_full_table_then_new_key(n in 1usize..40) {
        let mut m: LinearProbeMap<usize, usize> = LinearProbeMap::with_max_load(1.0).unwrap();
        for k in 0..n {
            m.put(k, k);
        }
        let len = m.len();
        m.rehash(len).unwrap();
        prop_assert_eq!(m.load(), 1.0);
        prop_assert_eq!(m.get(&usize::MAX), None);
        m.put(usize::MAX, 0);
        prop_assert!(m.capacity() >= 2 * len + 1);
        for k in 0..n {
            prop_assert_eq!(m.get(&k), Some(&k));
        }
    }
}
