//! The traversal engine.
//!
//! [`ViewDriver`] adapts a [`View`] to `serde::Serialize`: the object graph
//! is walked depth first and streamed into the serializer, deciding for
//! every property of every object whether it is written.

use alloc::string::String;
use alloc::sync::Arc;
use core::cell::RefCell;

use jv_reflect::info::TypeInfo;
use jv_reflect::{Reflect, ReflectRef};
use jv_utils::TypeIdMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::attrs::SerializeWith;
use crate::cache::MetadataCache;
use crate::config::{Inclusion, Resolution};
use crate::engine::ViewEngine;
use crate::error::WriteError;
use crate::rules::RuleSet;
use crate::store::MatchStore;
use crate::view::View;

mod decide;
mod frame;

use frame::Frame;

// -----------------------------------------------------------------------------
// ViewDriver

/// A [`View`] ready to be written by a [`ViewEngine`].
///
/// Implements [`Serialize`], so any serde format can write it; the
/// `ViewEngine::to_*` helpers use `serde_json`. Failures are reported
/// through the format's error type.
#[derive(Clone, Copy)]
pub struct ViewDriver<'a> {
    engine: &'a ViewEngine,
    view: &'a View<'a>,
}

impl<'a> ViewDriver<'a> {
    #[inline]
    pub(crate) fn new(engine: &'a ViewEngine, view: &'a View<'a>) -> Self {
        Self { engine, view }
    }
}

impl Serialize for ViewDriver<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let config = self.engine.config();
        let ctx = Context {
            engine: self.engine,
            store: self.view.store(),
            cache: self.engine.cache(),
            resolution: self.view.resolution().unwrap_or(config.resolution),
            inclusion: config.inclusion,
            max_depth: config.max_depth,
            type_matches: RefCell::new(TypeIdMap::new()),
        };
        ValueWriter {
            ctx: &ctx,
            frame: Frame::ROOT,
            value: self.view.value(),
        }
        .serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Context

/// State shared by every step of one serialization call.
pub(crate) struct Context<'a> {
    engine: &'a ViewEngine,
    store: &'a MatchStore,
    cache: &'a MetadataCache,
    resolution: Resolution,
    inclusion: Inclusion,
    max_depth: usize,
    type_matches: RefCell<TypeIdMap<Option<Arc<RuleSet>>>>,
}

impl Context<'_> {
    /// The rules attached to `info` or any of its ancestors.
    fn type_match(&self, info: &'static TypeInfo) -> Option<Arc<RuleSet>> {
        if self.store.is_empty() {
            return None;
        }
        if let Some(found) = self.type_matches.borrow().get(&info.type_id()) {
            return found.clone();
        }
        let found = self.store.lookup(&self.cache.ancestors(info));
        self.type_matches
            .borrow_mut()
            .insert(info.type_id(), found.clone());
        found
    }

    /// Picks the rules for the properties of an object, and whether their
    /// paths restart at the object.
    fn resolve<'r>(
        &self,
        inherited: Option<&'r RuleSet>,
        own: Option<&'r RuleSet>,
    ) -> (Option<&'r RuleSet>, bool) {
        match self.resolution {
            Resolution::TypeFirst => match own {
                Some(own) => (Some(own), true),
                None => (inherited, false),
            },
            Resolution::PathFirst => match inherited {
                Some(inherited) => (Some(inherited), false),
                None => (own, true),
            },
        }
    }
}

fn fail<E: serde::ser::Error>(error: WriteError) -> E {
    E::custom(error)
}

// -----------------------------------------------------------------------------
// ValueWriter

/// Writes one value of the graph.
struct ValueWriter<'c, 'f> {
    ctx: &'c Context<'c>,
    frame: Frame<'f>,
    value: &'f dyn Reflect,
}

impl Serialize for ValueWriter<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ctx = self.ctx;
        let kind = self.value.reflect_ref();
        if kind.is_null() {
            return serializer.serialize_none();
        }

        if let Some(represented) = self.value.represented()
            && let Some(custom) = ctx.engine.serializer(represented.ty_id())
        {
            return write_custom(custom, represented, self.frame.path, serializer);
        }

        if matches!(kind, ReflectRef::List(_) | ReflectRef::Map(_) | ReflectRef::Object(..))
            && self.frame.depth >= ctx.max_depth
        {
            return Err(fail(WriteError::DepthExceeded {
                path: String::from(self.frame.path),
                limit: ctx.max_depth,
            }));
        }

        match kind {
            ReflectRef::Null => serializer.serialize_none(),
            ReflectRef::Bool(v) => serializer.serialize_bool(v),
            ReflectRef::Int(v) => serializer.serialize_i64(v),
            ReflectRef::UInt(v) => serializer.serialize_u64(v),
            ReflectRef::Float(v) => serializer.serialize_f64(v),
            ReflectRef::Char(v) => serializer.serialize_char(v),
            ReflectRef::Str(v) | ReflectRef::Enum(v) => serializer.serialize_str(v),
            ReflectRef::Bytes(v) => serializer.serialize_bytes(v),
            ReflectRef::Opaque(v) => erased_serde::serialize(v, serializer),
            ReflectRef::List(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                let frame = self.frame.nested();
                for element in list.iter() {
                    seq.serialize_element(&ValueWriter {
                        ctx,
                        frame,
                        value: element,
                    })?;
                }
                seq.end()
            }
            ReflectRef::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    let path = self.frame.child_path(&key);
                    let frame = Frame {
                        path: &path,
                        ..self.frame.nested()
                    };
                    map.serialize_entry(&*key, &ValueWriter { ctx, frame, value })?;
                }
                map.end()
            }
            ReflectRef::Object(owner, info) => write_object(ctx, self.frame, owner, info, serializer),
        }
    }
}

fn write_custom<S: Serializer>(
    custom: &SerializeWith,
    value: &dyn Reflect,
    path: &str,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let output = custom.apply(value).map_err(|source| {
        fail::<S::Error>(WriteError::Serializer {
            path: String::from(path),
            source,
        })
    })?;
    erased_serde::serialize(&*output, serializer)
}

// -----------------------------------------------------------------------------
// Objects

fn write_object<S: Serializer>(
    ctx: &Context<'_>,
    frame: Frame<'_>,
    owner: &dyn Reflect,
    info: &'static TypeInfo,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let properties = ctx.cache.properties_of(info);
    let own = ctx.type_match(info);
    let (rules, restart) = ctx.resolve(frame.active, own.as_deref());
    let active = frame.active.or(own.as_deref());
    let prefix = if restart { String::new() } else { frame.prefix() };

    let mut map = serializer.serialize_map(None)?;
    let mut candidate = String::new();
    for property in properties.iter() {
        candidate.clear();
        candidate.push_str(&prefix);
        candidate.push_str(property.name());
        if !decide::field_allowed(ctx, rules, &candidate, property, frame.referring) {
            continue;
        }

        let name = property.output_name();
        let path = frame.child_path(name);

        let raw = property.read(owner).map_err(|source| {
            fail::<S::Error>(WriteError::Access {
                path: path.clone(),
                source,
            })
        })?;
        let transformed;
        let value: &dyn Reflect = match rules.and_then(|r| r.transform(&candidate)) {
            Some(transform) => {
                transformed = transform.apply(owner, &*raw).map_err(|source| {
                    fail::<S::Error>(WriteError::Transform {
                        path: path.clone(),
                        source,
                    })
                })?;
                &*transformed
            }
            None => &*raw,
        };

        if !decide::value_allowed(ctx, property, info, value) {
            continue;
        }

        if let Some(custom) = property.get_attribute::<SerializeWith>()
            && !value.reflect_ref().is_null()
        {
            map.serialize_key(name)?;
            map.serialize_value(&CustomWriter {
                custom,
                value,
                path: &path,
            })?;
            continue;
        }

        let child = Frame {
            path: &path,
            active,
            referring: Some(property),
            depth: frame.depth + 1,
        };
        map.serialize_entry(
            name,
            &ValueWriter {
                ctx,
                frame: child,
                value,
            },
        )?;
    }
    map.end()
}

/// Writes a value through a property-level custom serializer.
struct CustomWriter<'a> {
    custom: &'a SerializeWith,
    value: &'a dyn Reflect,
    path: &'a str,
}

impl Serialize for CustomWriter<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        write_custom(self.custom, self.value, self.path, serializer)
    }
}
