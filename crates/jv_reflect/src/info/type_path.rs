use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypePath

/// Static naming information for a type.
///
/// The defaults are right for almost every type; containers override
/// [`element_type`](TypePath::element_type) so that a `Vec<Child>` field
/// is known to refer to `Child`.
pub trait TypePath: 'static {
    /// The full path of the type, e.g. `alloc::vec::Vec<u8>`.
    #[inline]
    fn type_path() -> &'static str {
        core::any::type_name::<Self>()
    }

    /// The type a value refers to once containers and smart pointers are
    /// unwrapped.
    #[inline]
    fn element_type() -> Type {
        Type::of::<Self>()
    }
}

// -----------------------------------------------------------------------------
// Type

/// The identity of a type: its [`TypeId`] and its path.
///
/// Equality and hashing only consider the [`TypeId`].
///
/// # Examples
///
/// ```
/// use jv_reflect::info::{Type, TypePath};
///
/// let ty = Type::of::<Vec<String>>();
/// assert_eq!(ty.path(), "alloc::vec::Vec<alloc::string::String>");
/// assert_eq!(ty.name(), "Vec<alloc::string::String>");
///
/// assert_eq!(<Vec<String>>::element_type(), Type::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Creates the identity of `T`.
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path.
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the path without its module prefix.
    ///
    /// Generic arguments are kept as they are.
    pub fn name(&self) -> &'static str {
        let path = self.path;
        let end = path.find('<').unwrap_or(path.len());
        let start = path[..end].rfind("::").map_or(0, |i| i + 2);
        &path[start..]
    }

    /// Returns `true` if this is the identity of `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
