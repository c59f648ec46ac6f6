use alloc::string::String;
use alloc::sync::Arc;

use jv_reflect::Reflect;
use jv_reflect::info::{TypeInfo, Typed};
use jv_reflect::registry::TypeRegistry;

use crate::cache::MetadataCache;
use crate::config::Resolution;
use crate::error::ConfigError;
use crate::rules::Match;
use crate::store::MatchStore;

/// A value paired with the rules to write it with.
///
/// A view is built for one serialization call and read-only afterwards.
/// Rules are compiled and checked as they are attached, so configuration
/// mistakes surface here rather than in the middle of the output.
///
/// # Examples
///
/// ```
/// use jv_view::{Match, Resolution, View};
///
/// let numbers = vec![1_u32, 2, 3];
/// let view = View::of(&numbers).with_resolution(Resolution::PathFirst);
///
/// assert_eq!(view.resolution(), Some(Resolution::PathFirst));
/// assert!(view.store().is_empty());
/// ```
pub struct View<'a> {
    value: &'a dyn Reflect,
    store: MatchStore,
    resolution: Option<Resolution>,
    cache: Arc<MetadataCache>,
}

impl<'a> View<'a> {
    /// Wraps `value` without any rules.
    pub fn of(value: &'a dyn Reflect) -> Self {
        Self {
            value,
            store: MatchStore::new(),
            resolution: None,
            cache: Arc::new(MetadataCache::with_capacity(0)),
        }
    }

    /// Uses `cache` for the ancestor walks needed while attaching rules.
    ///
    /// Views created by [`ViewEngine::view`](crate::ViewEngine::view) share
    /// the engine's cache.
    pub fn with_cache(self, cache: Arc<MetadataCache>) -> Self {
        Self { cache, ..self }
    }

    /// Attaches rules to `T`, which may be a class or an interface.
    pub fn on_type<T: ?Sized + Typed>(self, rules: Match) -> Result<Self, ConfigError> {
        self.on_type_info(T::type_info(), rules)
    }

    /// Attaches rules to the type described by `info`.
    pub fn on_type_info(mut self, info: &'static TypeInfo, rules: Match) -> Result<Self, ConfigError> {
        let rules = rules.compile()?;
        let cache = &self.cache;
        self.store.insert(info, rules, |info| cache.ancestors(info))?;
        Ok(self)
    }

    /// Attaches rules to a type looked up by path or short name.
    pub fn on_type_name(
        self,
        registry: &TypeRegistry,
        name: &str,
        rules: Match,
    ) -> Result<Self, ConfigError> {
        let info = registry
            .resolve(name)
            .ok_or_else(|| ConfigError::UnknownType(String::from(name)))?;
        self.on_type_info(info, rules)
    }

    /// Overrides the engine's resolution order for this view.
    #[inline]
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        Self {
            resolution: Some(resolution),
            ..self
        }
    }

    #[inline]
    pub fn value(&self) -> &'a dyn Reflect {
        self.value
    }

    #[inline]
    pub fn store(&self) -> &MatchStore {
        &self.store
    }

    #[inline]
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }
}

impl core::fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("View")
            .field("value", &self.value.reflect_type_path())
            .field("store", &self.store)
            .field("resolution", &self.resolution)
            .finish()
    }
}
