use core::any::{Any, TypeId};
use core::fmt;

use crate::info::TypeInfo;
use crate::ops::{List, Map};

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable classification of a reflected value.
///
/// The serializer dispatches on this to decide how a value is emitted.
#[derive(Clone, Copy)]
pub enum ReflectRef<'a> {
    /// An absent value, such as `None` or `()`.
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
    /// A binary blob.
    Bytes(&'a [u8]),
    /// A fieldless enum value, carrying its symbolic name.
    Enum(&'a str),
    /// An array, sequence or set.
    List(&'a dyn List),
    /// An associative map with string-convertible keys.
    Map(&'a dyn Map),
    /// A structured value whose properties are described by [`TypeInfo`].
    ///
    /// The first element is the value that owns those properties, which is
    /// not necessarily the value `reflect_ref` was called on (`Option`, `Box`
    /// and `Arc` forward to their content).
    Object(&'a dyn Reflect, &'static TypeInfo),
    /// A well-known scalar emitted through its own serde implementation.
    Opaque(&'a dyn erased_serde::Serialize),
}

impl ReflectRef<'_> {
    /// Returns `true` for [`ReflectRef::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name of the variant, used in diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::UInt(_) | Self::Float(_) => "number",
            Self::Char(_) | Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(..) => "object",
            Self::Opaque(_) => "opaque",
        }
    }
}

impl fmt::Debug for ReflectRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            Self::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Self::List(v) => f.debug_tuple("List").field(&v.len()).finish(),
            Self::Map(v) => f.debug_tuple("Map").field(&v.len()).finish(),
            Self::Object(_, info) => f.debug_tuple("Object").field(&info.type_path()).finish(),
            Self::Opaque(_) => f.write_str("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// Reflect

/// Upcasts a sized reflected value to `&dyn Reflect`.
///
/// Implemented for every `T: Reflect`, so it never needs a manual impl.
pub trait AsReflect {
    fn as_reflect(&self) -> &dyn Reflect;
}

impl<T: Reflect> AsReflect for T {
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }
}

/// A value the serializer can inspect at runtime.
///
/// Most types implement this through [`impl_reflect_object!`],
/// [`impl_reflect_enum!`] or [`impl_reflect_opaque!`].
///
/// # Examples
///
/// ```
/// use jv_reflect::{Reflect, ReflectRef};
///
/// let value: &dyn Reflect = &Some(5_u8);
/// assert!(matches!(value.reflect_ref(), ReflectRef::UInt(5)));
///
/// let value: &dyn Reflect = &None::<u8>;
/// assert!(value.reflect_ref().is_null());
/// assert!(value.represented().is_none());
/// ```
///
/// [`impl_reflect_object!`]: crate::impl_reflect_object
/// [`impl_reflect_enum!`]: crate::impl_reflect_enum
/// [`impl_reflect_opaque!`]: crate::impl_reflect_opaque
pub trait Reflect: Any + AsReflect {
    /// Classifies the value.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns the value this one stands for.
    ///
    /// `Option`, `Box` and `Arc` forward to their content; an empty `Option`
    /// returns `None`. Other types return themselves.
    #[inline]
    fn represented(&self) -> Option<&dyn Reflect> {
        Some(self.as_reflect())
    }

    /// Returns the [`TypeInfo`] of structured values.
    #[inline]
    fn reflect_type_info(&self) -> Option<&'static TypeInfo> {
        None
    }

    /// Returns the type path of the concrete type.
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Returns the [`TypeId`] of the concrete type.
    ///
    /// Prefer this over `Any::type_id`, which is easy to call on a
    /// reference or a box by mistake.
    #[inline(always)]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

impl dyn Reflect {
    /// Returns `true` if the concrete type is `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts to a concrete type.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Downcasts to `T`, looking through `Option`, `Box` and `Arc` when the
    /// value itself is not a `T`.
    #[inline]
    pub fn downcast_represented<T: Any>(&self) -> Option<&T> {
        match self.downcast_ref::<T>() {
            Some(value) => Some(value),
            None => self.represented()?.downcast_ref::<T>(),
        }
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflect")
            .field("type", &self.reflect_type_path())
            .field("value", &self.reflect_ref())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Implementation macros

/// Implements [`Reflect`] and [`TypePath`] for structured types that
/// implement [`Typed`].
///
/// ```
/// use jv_reflect::info::{TypeInfo, TypeInfoCell, Typed};
///
/// struct Tag {
///     label: String,
/// }
///
/// impl Typed for Tag {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::class::<Self>().field("label", |t| &t.label).build())
///     }
/// }
///
/// jv_reflect::impl_reflect_object!(Tag);
/// ```
///
/// [`Reflect`]: crate::Reflect
/// [`TypePath`]: crate::info::TypePath
/// [`Typed`]: crate::info::Typed
#[macro_export]
macro_rules! impl_reflect_object {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::info::TypePath for $ty {}

        impl $crate::Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> $crate::ReflectRef<'_> {
                $crate::ReflectRef::Object(self, <Self as $crate::info::Typed>::type_info())
            }

            #[inline]
            fn reflect_type_info(&self) -> ::core::option::Option<&'static $crate::info::TypeInfo> {
                ::core::option::Option::Some(<Self as $crate::info::Typed>::type_info())
            }
        }
    )+};
}

/// Implements [`Reflect`] and [`TypePath`] for fieldless enums, emitting
/// each variant by its symbolic name.
///
/// ```
/// use jv_reflect::{Reflect, ReflectRef};
///
/// enum Color {
///     Red,
///     Green,
/// }
///
/// jv_reflect::impl_reflect_enum!(Color { Red, Green });
///
/// assert!(matches!(Color::Green.reflect_ref(), ReflectRef::Enum("Green")));
/// # let _ = Color::Red;
/// ```
///
/// [`Reflect`]: crate::Reflect
/// [`TypePath`]: crate::info::TypePath
#[macro_export]
macro_rules! impl_reflect_enum {
    ($ty:ty { $($variant:ident),* $(,)? }) => {
        impl $crate::info::TypePath for $ty {}

        impl $crate::Reflect for $ty {
            fn reflect_ref(&self) -> $crate::ReflectRef<'_> {
                $crate::ReflectRef::Enum(match self {
                    $(Self::$variant => ::core::stringify!($variant),)*
                })
            }
        }
    };
}

/// Implements [`Reflect`] and [`TypePath`] for types that serialize
/// themselves through serde.
///
/// [`Reflect`]: crate::Reflect
/// [`TypePath`]: crate::info::TypePath
#[macro_export]
macro_rules! impl_reflect_opaque {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::info::TypePath for $ty {}

        impl $crate::Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> $crate::ReflectRef<'_> {
                $crate::ReflectRef::Opaque(self)
            }
        }
    )+};
}
