use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;

use crate::info::{CustomAttributes, Type, TypePath, Visibility};
use crate::{AccessError, PropertyValue, ReadFn, Reflect};

/// The prefix that marks a method as a property accessor.
pub const GETTER_PREFIX: &str = "get";

// -----------------------------------------------------------------------------
// MethodInfo

/// A declared method of a type.
///
/// Only zero-argument, value-returning methods named with [`GETTER_PREFIX`]
/// become properties. Other methods can still be declared with
/// [`MethodInfo::signature`] so that the full shape of a type is known.
#[derive(Clone)]
pub struct MethodInfo {
    name: &'static str,
    params: usize,
    returns: Option<Type>,
    element: Option<Type>,
    visibility: Visibility,
    is_static: bool,
    reader: Option<Arc<ReadFn>>,
    custom_attributes: Option<Arc<CustomAttributes>>,
}

impl MethodInfo {
    /// Creates a public, zero-argument accessor returning `V`.
    pub fn getter<V: Reflect + TypePath>(name: &'static str, reader: Arc<ReadFn>) -> Self {
        Self {
            name,
            params: 0,
            returns: Some(Type::of::<V>()),
            element: Some(V::element_type()),
            visibility: Visibility::Public,
            is_static: false,
            reader: Some(reader),
            custom_attributes: None,
        }
    }

    /// Declares a method by its shape alone.
    ///
    /// The method has no reader. `returns` is `None` for methods returning
    /// nothing.
    pub fn signature(name: &'static str, params: usize, returns: Option<Type>) -> Self {
        Self {
            name,
            params,
            returns,
            element: returns,
            visibility: Visibility::Public,
            is_static: false,
            reader: None,
            custom_attributes: None,
        }
    }

    /// Sets the visibility.
    #[inline]
    pub fn with_visibility(self, visibility: Visibility) -> Self {
        Self { visibility, ..self }
    }

    /// Marks the method as an associated function without a receiver.
    #[inline]
    pub fn with_static(self, is_static: bool) -> Self {
        Self { is_static, ..self }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The number of parameters, not counting the receiver.
    #[inline]
    pub fn params(&self) -> usize {
        self.params
    }

    /// The return type, `None` for methods returning nothing.
    #[inline]
    pub fn returns(&self) -> Option<Type> {
        self.returns
    }

    /// The type the result refers to once containers are unwrapped.
    #[inline]
    pub fn element_type(&self) -> Option<Type> {
        self.element
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub fn reader(&self) -> Option<&Arc<ReadFn>> {
        self.reader.as_ref()
    }

    /// Returns `true` for zero-argument, value-returning methods whose name
    /// starts with [`GETTER_PREFIX`].
    #[inline]
    pub fn is_getter(&self) -> bool {
        self.params == 0 && self.returns.is_some() && self.name.starts_with(GETTER_PREFIX)
    }

    /// Returns the logical property name of an accessor.
    ///
    /// The prefix is stripped, along with one following `_`, and the first
    /// remaining character is lower-cased. A method named exactly like the
    /// prefix, or one that would strip to nothing, keeps its name.
    ///
    /// ```
    /// use jv_reflect::info::MethodInfo;
    ///
    /// let name = |n| MethodInfo::signature(n, 0, None).property_name();
    /// assert_eq!(name("getWidgetName"), "widgetName");
    /// assert_eq!(name("get_widget_name"), "widget_name");
    /// assert_eq!(name("get"), "get");
    /// assert_eq!(name("get_"), "get_");
    /// ```
    pub fn property_name(&self) -> Cow<'static, str> {
        let Some(rest) = self.name.strip_prefix(GETTER_PREFIX) else {
            return Cow::Borrowed(self.name);
        };
        let rest = rest.strip_prefix('_').unwrap_or(rest);
        let mut chars = rest.chars();
        match chars.next() {
            None => Cow::Borrowed(self.name),
            Some(first) if first.is_lowercase() || !first.is_alphabetic() => Cow::Borrowed(rest),
            Some(first) => {
                let mut name = String::with_capacity(rest.len());
                name.extend(first.to_lowercase());
                name.push_str(chars.as_str());
                Cow::Owned(name)
            }
        }
    }

    /// Reads the accessor's value from its owner.
    pub fn read<'a>(&self, owner: &'a dyn Reflect) -> Result<PropertyValue<'a>, AccessError> {
        match &self.reader {
            Some(reader) => reader(owner),
            None => Err(AccessError::NoReader {
                owner: owner.reflect_type_path(),
                member: self.name,
            }),
        }
    }

    crate::info::impl_custom_attributes_fn!(custom_attributes);
}

impl core::fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}
