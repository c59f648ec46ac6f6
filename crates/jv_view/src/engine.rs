use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use jv_reflect::Reflect;
use jv_utils::TypeIdMap;
use serde::Serialize;

use crate::attrs::SerializeWith;
use crate::cache::MetadataCache;
use crate::config::{Inclusion, Resolution, ViewConfig};
use crate::error::ConfigError;
use crate::view::View;
use crate::writer::ViewDriver;

/// Writes [`View`]s.
///
/// An engine holds the configuration, the custom serializers and the
/// metadata cache. It is meant to be built once and shared: writing takes
/// `&self`, and any number of threads may write through the same engine.
///
/// # Examples
///
/// ```
/// use jv_view::{Inclusion, ViewConfig, ViewEngine};
///
/// let mut engine = ViewEngine::with_config(ViewConfig::default().with_inclusion(Inclusion::NonNull));
/// engine
///     .register_serializer::<u32, _, _>(|n| format!("#{n}"))
///     .unwrap();
///
/// let value = vec![Some(1_u32), None];
/// let view = engine.view(&value);
///
/// assert_eq!(engine.to_string(&view).unwrap(), r##"["#1",null]"##);
/// ```
pub struct ViewEngine {
    config: ViewConfig,
    cache: Arc<MetadataCache>,
    serializers: TypeIdMap<(&'static str, SerializeWith)>,
}

impl Default for ViewEngine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ViewEngine {
    /// Creates an engine with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(ViewConfig::default())
    }

    /// Creates an engine with its own cache sized by `config`.
    pub fn with_config(config: ViewConfig) -> Self {
        let cache = Arc::new(MetadataCache::with_capacity(config.cache_size));
        Self {
            config,
            cache,
            serializers: TypeIdMap::new(),
        }
    }

    /// Replaces the metadata cache, e.g. to share one between engines.
    pub fn with_cache(self, cache: Arc<MetadataCache>) -> Self {
        Self { cache, ..self }
    }

    #[inline]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    /// Sets the resolution order of views that do not choose one.
    #[inline]
    pub fn set_default_resolution(&mut self, resolution: Resolution) {
        self.config.resolution = resolution;
    }

    /// Sets the null policy of types and fields without their own.
    #[inline]
    pub fn set_default_inclusion(&mut self, inclusion: Inclusion) {
        self.config.inclusion = inclusion;
    }

    /// Starts a [`View`] of `value` sharing this engine's cache.
    #[inline]
    pub fn view<'a>(&self, value: &'a dyn Reflect) -> View<'a> {
        View::of(value).with_cache(self.cache.clone())
    }

    // -------------------------------------------------------------------------
    // Custom serializers

    /// Writes every non-null value of type `T` as `f(value)`.
    ///
    /// A [`SerializeWith`] tag on a property takes precedence. Fails if `T`
    /// already has a serializer.
    pub fn register_serializer<T, R, F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        T: Reflect,
        R: Serialize + 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.register_serializer_with::<T>(SerializeWith::new(f))
    }

    /// Writes every non-null value of type `T` through `with`.
    pub fn register_serializer_with<T: Reflect>(&mut self, with: SerializeWith) -> Result<(), ConfigError> {
        let name = core::any::type_name::<T>();
        if self.serializers.contains_type::<T>() {
            return Err(ConfigError::DuplicateSerializer(name));
        }
        log::debug!("custom serializer registered for `{name}`");
        self.serializers.insert_type::<T>((name, with));
        Ok(())
    }

    /// Removes the serializer of `T`, returning `true` if there was one.
    pub fn unregister_serializer<T: Reflect>(&mut self) -> bool {
        self.serializers.remove_type::<T>().is_some()
    }

    /// The serializer registered for the type `type_id`.
    #[inline]
    pub fn serializer(&self, type_id: TypeId) -> Option<&SerializeWith> {
        self.serializers.get(&type_id).map(|(_, with)| with)
    }

    // -------------------------------------------------------------------------
    // Output

    /// Pairs `view` with this engine as a [`serde::Serialize`] value.
    #[inline]
    pub fn driver<'a>(&'a self, view: &'a View<'a>) -> ViewDriver<'a> {
        ViewDriver::new(self, view)
    }

    pub fn to_string(&self, view: &View<'_>) -> serde_json::Result<String> {
        serde_json::to_string(&self.driver(view))
    }

    pub fn to_string_pretty(&self, view: &View<'_>) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.driver(view))
    }

    pub fn to_vec(&self, view: &View<'_>) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.driver(view))
    }

    /// Streams the output into `writer`.
    ///
    /// On error, `writer` may have received part of the output.
    pub fn to_writer<W: std::io::Write>(&self, writer: W, view: &View<'_>) -> serde_json::Result<()> {
        serde_json::to_writer(writer, &self.driver(view))
    }

    pub fn to_value(&self, view: &View<'_>) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.driver(view))
    }
}

impl fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEngine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field(
                "serializers",
                &self.serializers.values().map(|(name, _)| *name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
