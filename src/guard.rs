//! Debug-only probe guard.
//!
//! Probing calls user code (`K: Hash`, `K: Eq`). If that code reaches back
//! into the same map, the nested call would observe the map mid-operation.
//! `ProbeGuard` catches this in debug builds and compiles away in release.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct ProbeGuard {
    #[cfg(debug_assertions)]
    active: Cell<bool>,
    // Same auto traits in every profile: Send, never Sync.
    _unsync: PhantomData<Cell<()>>,
}

impl ProbeGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(false),
            _unsync: PhantomData,
        }
    }

    /// Mark a probe as in flight until the returned token drops.
    #[inline]
    pub(crate) fn enter(&self) -> Probing<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.active.replace(true),
                "map re-entered from K: Hash or K: Eq while probing"
            );
            return Probing { guard: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return Probing { _guard: PhantomData };
        }
    }
}

pub(crate) struct Probing<'a> {
    #[cfg(debug_assertions)]
    guard: &'a ProbeGuard,
    #[cfg(not(debug_assertions))]
    _guard: PhantomData<&'a ProbeGuard>,
}

impl Drop for Probing<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.guard.active.set(false);
    }
}
