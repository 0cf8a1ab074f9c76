//! Error type shared by the map and its cursor.

use thiserror::Error;

/// Failures reported by `LinearProbeMap` and `Cursor`.
///
/// Absent keys are not errors; lookups and removals return `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MapError {
    /// Maximum load factor outside `(0, 1]` (NaN included).
    #[error("max load must be in (0, 1], got {0}")]
    InvalidMaxLoad(f32),

    /// Explicit rehash to a capacity that cannot hold the live entries.
    #[error("cannot rehash {len} entries into capacity {requested}")]
    CapacityTooSmall { requested: usize, len: usize },

    /// The map was structurally modified outside the cursor since the
    /// cursor last synchronized with it.
    #[error("map modified during iteration (expected generation {expected}, found {found})")]
    ConcurrentModification { expected: u64, found: u64 },
}

pub type Result<T> = std::result::Result<T, MapError>;
