//! Provide hash containers, re-exports *hashbrown* and *foldhash*.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

pub use hashbrown::Equivalent;

/// Hashes a single value with [`FixedHashState`].
///
/// The result only depends on the input, so it is stable across runs.
///
/// # Examples
///
/// ```
/// use jv_utils::hash::hash_one;
///
/// assert_eq!(hash_one("a.b"), hash_one("a.b"));
/// assert_ne!(hash_one("a.b"), hash_one("a.c"));
/// ```
#[inline]
pub fn hash_one<T: core::hash::Hash + ?Sized>(value: &T) -> u64 {
    use core::hash::BuildHasher;
    FixedHashState.hash_one(value)
}

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
