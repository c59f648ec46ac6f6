//! Shared, bounded memoization of type metadata.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;
use core::hash::Hash;
use std::sync::{PoisonError, RwLock};

use jv_reflect::info::TypeInfo;
use jv_utils::hash::{Equivalent, HashMap};

use crate::config::DEFAULT_CACHE_SIZE;
use crate::hierarchy::{self, Ancestor};
use crate::introspect::{self, PropertyDescriptor, PropertyId};
use crate::pattern::{MatchKind, PatternSet};

// -----------------------------------------------------------------------------
// BoundedCache

/// A map shared between threads that holds at most `capacity` entries.
///
/// Values are computed without holding the lock, so two threads missing
/// the same key may both compute it; the values must be equal. Inserting
/// into a full map evicts an arbitrary entry.
pub struct BoundedCache<K, V> {
    map: RwLock<HashMap<K, V>>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V: Clone> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: RwLock::new(HashMap::default()),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get<Q: Hash + Equivalent<K> + ?Sized>(&self, key: &Q) -> Option<V> {
        let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        if map.len() >= self.capacity && !map.contains_key(&key) {
            let victim = map.keys().next().cloned();
            if let Some(victim) = victim {
                map.remove(&victim);
                log::trace!("metadata cache full ({} entries), evicted one", self.capacity);
            }
        }
        map.insert(key, value);
    }

    /// Returns the cached value of `key`, computing it on a miss.
    pub fn get_or_insert_with(&self, key: K, f: impl FnOnce(&K) -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = f(&key);
        self.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.map.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

// -----------------------------------------------------------------------------
// Keys

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct IgnoreKey {
    property: PropertyId,
    referring: Option<PropertyId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PatternKey {
    set: PatternSet,
    candidate: Box<str>,
    allow_prefix: bool,
}

/// A borrowed [`PatternKey`], hashing the same way.
#[derive(Hash)]
struct PatternQuery<'a> {
    set: &'a PatternSet,
    candidate: &'a str,
    allow_prefix: bool,
}

impl Equivalent<PatternKey> for PatternQuery<'_> {
    #[inline]
    fn equivalent(&self, key: &PatternKey) -> bool {
        self.allow_prefix == key.allow_prefix
            && *self.candidate == *key.candidate
            && *self.set == key.set
    }
}

// -----------------------------------------------------------------------------
// MetadataCache

/// Memoized ancestor walks, property lists, ignore decisions and pattern
/// matches.
///
/// Every entry is a pure function of its key, so the cache can be shared by
/// any number of engines and threads.
pub struct MetadataCache {
    ancestors: BoundedCache<TypeId, Arc<[Ancestor]>>,
    properties: BoundedCache<TypeId, Arc<[PropertyDescriptor]>>,
    ignored: BoundedCache<IgnoreKey, bool>,
    patterns: BoundedCache<PatternKey, MatchKind>,
}

impl Default for MetadataCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataCache {
    /// Creates a cache holding up to [`DEFAULT_CACHE_SIZE`] entries per map.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_SIZE)
    }

    /// Creates a cache holding up to `capacity` entries per map.
    ///
    /// A capacity of zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ancestors: BoundedCache::new(capacity),
            properties: BoundedCache::new(capacity),
            ignored: BoundedCache::new(capacity),
            patterns: BoundedCache::new(capacity),
        }
    }

    /// `info` and its ancestors; see [`hierarchy::ancestors`].
    pub fn ancestors(&self, info: &'static TypeInfo) -> Arc<[Ancestor]> {
        self.ancestors
            .get_or_insert_with(info.type_id(), |_| hierarchy::ancestors(info).into())
    }

    /// The properties of `info`; see [`introspect::properties_of`].
    pub fn properties_of(&self, info: &'static TypeInfo) -> Arc<[PropertyDescriptor]> {
        if let Some(props) = self.properties.get(&info.type_id()) {
            return props;
        }
        let ancestors = self.ancestors(info);
        let props: Arc<[PropertyDescriptor]> = introspect::properties_of(info, &ancestors).into();
        self.properties.insert(info.type_id(), props.clone());
        props
    }

    /// Whether tags always leave `property` out when reached through
    /// `referring`.
    pub fn is_ignored(&self, property: &PropertyDescriptor, referring: Option<&PropertyDescriptor>) -> bool {
        let key = IgnoreKey {
            property: property.id(),
            referring: referring.map(PropertyDescriptor::id),
        };
        self.ignored
            .get_or_insert_with(key, |_| crate::ignore::resolve(self, property, referring))
    }

    /// Matches `candidate` against `set`; see [`PatternSet::evaluate`].
    pub fn evaluate(&self, set: &PatternSet, candidate: &str, allow_prefix: bool) -> MatchKind {
        if set.is_empty() {
            return MatchKind::None;
        }
        let query = PatternQuery {
            set,
            candidate,
            allow_prefix,
        };
        if let Some(kind) = self.patterns.get(&query) {
            return kind;
        }
        let kind = set.evaluate(candidate, allow_prefix);
        self.patterns.insert(
            PatternKey {
                set: set.clone(),
                candidate: candidate.into(),
                allow_prefix,
            },
            kind,
        );
        kind
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.ancestors.clear();
        self.properties.clear();
        self.ignored.clear();
        self.patterns.clear();
    }
}

impl core::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("ancestors", &self.ancestors.len())
            .field("properties", &self.properties.len())
            .field("ignored", &self.ignored.len())
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_by_capacity() {
        let cache = BoundedCache::<u32, u32>::new(3);
        for i in 0..10 {
            cache.insert(i, i * 2);
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&9), Some(18));

        // replacing an existing key never evicts
        cache.insert(9, 1);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&9), Some(1));
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = BoundedCache::<u32, u32>::new(0);
        assert_eq!(cache.get_or_insert_with(1, |k| k + 1), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn computes_once_per_key() {
        let cache = BoundedCache::<&str, usize>::new(4);
        let mut calls = 0;
        for _ in 0..3 {
            let v = cache.get_or_insert_with("abc", |k| {
                calls += 1;
                k.len()
            });
            assert_eq!(v, 3);
        }
        assert_eq!(calls, 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn pattern_results_are_cached() {
        let cache = MetadataCache::with_capacity(8);
        let set = PatternSet::compile(["a.*", "b"]).unwrap();
        assert_eq!(cache.evaluate(&set, "a.x", false), MatchKind::Wildcard);
        assert_eq!(cache.evaluate(&set, "a.x", false), MatchKind::Wildcard);
        assert_eq!(cache.evaluate(&set, "b", false), MatchKind::Exact);
        assert_eq!(cache.patterns.len(), 2);

        // an equal set compiled separately hits the same entries
        let again = PatternSet::compile(["b", "a.*"]).unwrap();
        assert_eq!(cache.evaluate(&again, "b", false), MatchKind::Exact);
        assert_eq!(cache.patterns.len(), 2);

        assert_eq!(cache.evaluate(&PatternSet::empty(), "b", true), MatchKind::None);
        assert_eq!(cache.patterns.len(), 2);
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let cache = BoundedCache::<u64, u64>::new(16);
        std::thread::scope(|s| {
            for t in 0..4_u64 {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..200 {
                        let key = (i * 7 + t) % 40;
                        assert_eq!(cache.get_or_insert_with(key, |k| k * k), key * key);
                    }
                });
            }
        });
        assert!(cache.len() <= 16);
    }
}
