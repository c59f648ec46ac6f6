//! Metadata tags read by the serializer.
//!
//! Tags are plain values stored as custom attributes on a type, field or
//! accessor:
//!
//! ```
//! use jv_reflect::info::{TypeInfo, TypeInfoCell, Typed};
//! use jv_view::attrs::{Ignore, Rename};
//!
//! struct User {
//!     name: String,
//!     password: String,
//! }
//!
//! impl Typed for User {
//!     fn type_info() -> &'static TypeInfo {
//!         static CELL: TypeInfoCell = TypeInfoCell::new();
//!         CELL.get_or_init(|| {
//!             TypeInfo::class::<Self>()
//!                 .getter_with("getName", |u| &u.name, |m| m.with_attribute(Rename::new("login")))
//!                 .getter_with("getPassword", |u| &u.password, |m| m.with_attribute(Ignore::default()))
//!                 .build()
//!         })
//!     }
//! }
//!
//! jv_reflect::impl_reflect_object!(User);
//! ```
//!
//! Tags of a field and an accessor describing the same property are merged;
//! where both carry the same tag, the accessor's wins.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use jv_reflect::info::Visibility;
use jv_reflect::{AccessError, Reflect};
use serde::Serialize;

use crate::config::Inclusion;

// -----------------------------------------------------------------------------
// Ignore

/// Always leaves the property out, unless a rule set includes it exactly.
///
/// `Ignore(false)` behaves as if the tag were absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ignore(pub bool);

impl Default for Ignore {
    #[inline]
    fn default() -> Self {
        Self(true)
    }
}

// -----------------------------------------------------------------------------
// Rename

/// Writes the property under another name.
///
/// Rule sets still match the logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename(pub Cow<'static, str>);

impl Rename {
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The new name; an empty one keeps the logical name.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        if self.0.is_empty() { None } else { Some(&self.0) }
    }
}

// -----------------------------------------------------------------------------
// IgnoreProperties

/// Ignores the listed properties.
///
/// On a type, this applies to the type's own properties. On a field, it
/// applies to the properties of the value reached through that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreProperties(Box<[Cow<'static, str>]>);

impl IgnoreProperties {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    #[inline]
    pub fn names(&self) -> &[Cow<'static, str>] {
        &self.0
    }
}

// -----------------------------------------------------------------------------
// Reference roles

/// Marks the forward side of a parent/child pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManagedReference;

/// Marks the back side of a parent/child pair.
///
/// The property is left out when its object was reached through a
/// [`ManagedReference`] of the matching type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackReference;

// -----------------------------------------------------------------------------
// Include

/// The null policy of a field or type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Include(pub Inclusion);

// -----------------------------------------------------------------------------
// AutoDetect

/// Which members of a given visibility become properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Detect {
    Any,
    PublicOnly,
    ProtectedAndPublic,
    NonPrivate,
    None,
    /// The default of the member kind.
    #[default]
    Default,
}

impl Detect {
    /// Returns `true` if a member of `visibility` is detected, using
    /// `default` for [`Detect::Default`].
    pub fn allows(self, visibility: Visibility, default: bool) -> bool {
        match self {
            Self::Any => true,
            Self::PublicOnly => visibility == Visibility::Public,
            Self::ProtectedAndPublic => {
                matches!(visibility, Visibility::Public | Visibility::Protected)
            }
            Self::NonPrivate => !visibility.is_private(),
            Self::None => false,
            Self::Default => default,
        }
    }
}

/// The detection policy of a type.
///
/// Without this tag fields are never properties and accessors always are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AutoDetect {
    pub fields: Detect,
    pub getters: Detect,
}

impl AutoDetect {
    #[inline]
    pub const fn new() -> Self {
        Self {
            fields: Detect::Default,
            getters: Detect::Default,
        }
    }

    #[inline]
    pub const fn with_fields(self, fields: Detect) -> Self {
        Self { fields, ..self }
    }

    #[inline]
    pub const fn with_getters(self, getters: Detect) -> Self {
        Self { getters, ..self }
    }

    /// A tag-less type keeps no field.
    #[inline]
    pub fn field_visible(&self, visibility: Visibility) -> bool {
        self.fields.allows(visibility, false)
    }

    /// A tag-less type keeps every accessor.
    #[inline]
    pub fn getter_visible(&self, visibility: Visibility) -> bool {
        self.getters.allows(visibility, true)
    }
}

// -----------------------------------------------------------------------------
// SerializeWith

/// Turns a value into something serde can write.
pub type SerializeFn =
    dyn Fn(&dyn Reflect) -> Result<Box<dyn erased_serde::Serialize>, AccessError> + Send + Sync;

/// A custom serializer for a property, or for a type when registered with
/// [`ViewEngine::register_serializer`](crate::ViewEngine::register_serializer).
///
/// It is never called for null values.
#[derive(Clone)]
pub struct SerializeWith(Arc<SerializeFn>);

impl SerializeWith {
    /// Serializes values of type `T` as the result of `f`.
    ///
    /// `Option`, `Box` and `Arc` around `T` are looked through; any other
    /// type is an [`AccessError`].
    ///
    /// # Examples
    ///
    /// ```
    /// use jv_view::attrs::SerializeWith;
    ///
    /// let upper = SerializeWith::new(|s: &String| s.to_uppercase());
    /// let value = upper.apply(&String::from("ok")).unwrap();
    ///
    /// assert_eq!(serde_json::to_string(&value).unwrap(), r#""OK""#);
    /// ```
    pub fn new<T, R, F>(f: F) -> Self
    where
        T: Reflect,
        R: Serialize + 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        Self(Arc::new(
            move |value: &dyn Reflect| -> Result<Box<dyn erased_serde::Serialize>, AccessError> {
                let this = value
                    .downcast_represented::<T>()
                    .ok_or_else(|| AccessError::mismatch::<T>(value))?;
                Ok(Box::new(f(this)))
            },
        ))
    }

    /// Wraps an untyped serializer function.
    #[inline]
    pub fn from_fn(f: Arc<SerializeFn>) -> Self {
        Self(f)
    }

    /// Produces the value to write in place of `value`.
    #[inline]
    pub fn apply(&self, value: &dyn Reflect) -> Result<Box<dyn erased_serde::Serialize>, AccessError> {
        (self.0)(value)
    }
}

impl fmt::Debug for SerializeWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SerializeWith(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rename_keeps_name() {
        assert_eq!(Rename::new("").name(), None);
        assert_eq!(Rename::new("other").name(), Some("other"));
    }

    #[test]
    fn detection_defaults() {
        let auto = AutoDetect::default();
        assert!(!auto.field_visible(Visibility::Public));
        assert!(auto.getter_visible(Visibility::Private));

        let auto = AutoDetect::new()
            .with_fields(Detect::NonPrivate)
            .with_getters(Detect::None);
        assert!(auto.field_visible(Visibility::Crate));
        assert!(!auto.field_visible(Visibility::Private));
        assert!(!auto.getter_visible(Visibility::Public));
    }

    #[test]
    fn detect_levels() {
        assert!(Detect::ProtectedAndPublic.allows(Visibility::Protected, false));
        assert!(!Detect::ProtectedAndPublic.allows(Visibility::Crate, false));
        assert!(!Detect::PublicOnly.allows(Visibility::Protected, true));
        assert!(Detect::Any.allows(Visibility::Private, false));
    }

    #[test]
    fn serialize_with_rejects_other_types() {
        let len = SerializeWith::new(|s: &String| s.len());
        assert!(len.apply(&Some(String::from("abc"))).is_ok());
        assert!(matches!(
            len.apply(&5_u8),
            Err(AccessError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn ignore_properties_lookup() {
        let ignored = IgnoreProperties::new(["a", "b"]);
        assert!(ignored.contains("b"));
        assert!(!ignored.contains("c"));
        assert_eq!(ignored.names().len(), 2);
    }
}
