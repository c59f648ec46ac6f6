//! The rule sets of one view, keyed by type.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use jv_reflect::info::TypeInfo;
use jv_utils::TypeIdMap;

use crate::error::ConfigError;
use crate::hierarchy::Ancestor;
use crate::rules::RuleSet;

struct Entry {
    info: &'static TypeInfo,
    rules: Arc<RuleSet>,
}

/// Maps types and interfaces to the rule sets attached to them.
///
/// Filled while a [`View`](crate::View) is built, read-only afterwards.
#[derive(Default)]
pub struct MatchStore {
    entries: TypeIdMap<Entry>,
}

impl MatchStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `rules` to `info`.
    ///
    /// Fails if `info` already has rules, or if a transform path of `rules`
    /// is also transformed by the rules of a type related to `info`
    /// through inheritance. `ancestors_of` lists the ancestors of a type.
    pub fn insert(
        &mut self,
        info: &'static TypeInfo,
        rules: RuleSet,
        ancestors_of: impl Fn(&'static TypeInfo) -> Arc<[Ancestor]>,
    ) -> Result<(), ConfigError> {
        if self.entries.contains(&info.type_id()) {
            return Err(ConfigError::DuplicateRules(info.type_path()));
        }

        let own = ancestors_of(info);
        for entry in self.entries.values() {
            let related = own.iter().any(|a| a.info().type_id() == entry.info.type_id())
                || ancestors_of(entry.info)
                    .iter()
                    .any(|a| a.info().type_id() == info.type_id());
            if !related {
                continue;
            }
            if let Some(path) = rules
                .transform_paths()
                .find(|path| entry.rules.transform(path).is_some())
            {
                return Err(ConfigError::TransformCollision {
                    path: path.into(),
                    first: entry.info.type_path(),
                    second: info.type_path(),
                });
            }
        }

        self.entries.insert(
            info.type_id(),
            Entry {
                info,
                rules: Arc::new(rules),
            },
        );
        Ok(())
    }

    /// The rules attached to exactly this type.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&Arc<RuleSet>> {
        self.entries.get(&type_id).map(|entry| &entry.rules)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the rules applying to a type, given its ancestors.
    ///
    /// Rules attached to any ancestor apply. With several matches, the
    /// result is their union.
    pub fn lookup(&self, ancestors: &[Ancestor]) -> Option<Arc<RuleSet>> {
        let matched: Vec<&Arc<RuleSet>> = ancestors
            .iter()
            .filter_map(|a| self.get(a.info().type_id()))
            .collect();

        match matched.as_slice() {
            [] => None,
            [single] => Some(Arc::clone(single)),
            many => {
                log::debug!(
                    "{} rule sets match `{}`, using their union",
                    many.len(),
                    ancestors.first().map_or("?", |a| a.info().type_path()),
                );
                Some(Arc::new(RuleSet::union(many.iter().map(|r| &***r))))
            }
        }
    }
}

impl core::fmt::Debug for MatchStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.entries.values().map(|e| (e.info.type_path(), &e.rules)))
            .finish()
    }
}
