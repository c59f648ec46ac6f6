//! Containers for static storage of type information.
//!
//! For non-generic types, [`TypeInfoCell`] wraps a [`OnceLock`].
//!
//! A `static CELL` inside a generic function is shared by every
//! instantiation, so [`GenericTypeInfoCell`] keys its entries by
//! [`TypeId`] behind a [`RwLock`].

use alloc::boxed::Box;
use core::any::TypeId;
use std::sync::{OnceLock, PoisonError, RwLock};

use jv_utils::TypeIdMap;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// TypeInfoCell

/// Container for the [`TypeInfo`] of a non-generic type.
///
/// See [`Typed`](crate::info::Typed).
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, creating it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeInfoCell

/// Container for the [`TypeInfo`] of generic types.
///
/// # Examples
///
/// ```
/// use jv_reflect::Reflect;
/// use jv_reflect::info::{GenericTypeInfoCell, TypeInfo, TypePath, Typed};
///
/// struct Wrapper<T>(T);
///
/// impl<T: Reflect + TypePath> TypePath for Wrapper<T> {}
///
/// impl<T: Reflect + TypePath> Typed for Wrapper<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::class::<Self>().field("value", |w| &w.0).build())
///     }
/// }
///
/// impl<T: Reflect + TypePath> Reflect for Wrapper<T> {
///     fn reflect_ref(&self) -> jv_reflect::ReflectRef<'_> {
///         jv_reflect::ReflectRef::Object(self, Self::type_info())
///     }
/// }
///
/// let a = <Wrapper<u8>>::type_info();
/// let b = <Wrapper<String>>::type_info();
/// assert_ne!(a.type_id(), b.type_id());
/// assert!(core::ptr::eq(a, <Wrapper<u8>>::type_info()));
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, creating it with `f` on first access.
    ///
    /// Created entries are leaked; there is one per instantiated type.
    pub fn get_or_insert<G: ?Sized + 'static>(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        let type_id = TypeId::of::<G>();

        let read = self.0.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(info) = read.get(&type_id) {
            return *info;
        }
        drop(read);

        // `f` may initialize other instantiations through this cell,
        // so it must run without the lock.
        let info = f();

        let mut write = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *write.get_or_insert(type_id, || Box::leak(Box::new(info)))
    }
}
