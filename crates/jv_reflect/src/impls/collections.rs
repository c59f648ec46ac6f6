use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::hash::BuildHasher;

use crate::info::{Type, TypePath};
use crate::ops::{List, Map, MapKey};
use crate::{Reflect, ReflectRef};

// -----------------------------------------------------------------------------
// Sequences and sets

macro_rules! impl_reflect_list {
    ($({$($generics:tt)*} $ty:ty),* $(,)?) => {$(
        impl<$($generics)*> List for $ty {
            #[inline]
            fn len(&self) -> usize {
                self[..].len()
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(self[..].iter().map(|item| item as &dyn Reflect))
            }
        }
    )*};
}

impl_reflect_list!(
    {T: Reflect} Vec<T>,
    {T: Reflect} Box<[T]>,
    {T: Reflect, const N: usize} [T; N],
);

macro_rules! impl_reflect_iterable_list {
    ($({$($generics:tt)*} $ty:ty),* $(,)?) => {$(
        impl<$($generics)*> List for $ty {
            #[inline]
            fn len(&self) -> usize {
                Self::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(Self::iter(self).map(|item| item as &dyn Reflect))
            }
        }
    )*};
}

impl_reflect_iterable_list!(
    {T: Reflect} VecDeque<T>,
    {T: Reflect} BTreeSet<T>,
    {T: Reflect, S: BuildHasher + 'static} std::collections::HashSet<T, S>,
    {T: Reflect, S: BuildHasher + 'static} jv_utils::hash::HashSet<T, S>,
);

macro_rules! impl_reflect_as_list {
    ($({$($generics:tt)*} $ty:ty),* $(,)?) => {$(
        impl<$($generics)*> TypePath for $ty {
            #[inline]
            fn element_type() -> Type {
                T::element_type()
            }
        }

        impl<$($generics)*> Reflect for $ty where $ty: List {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::List(self)
            }
        }
    )*};
}

impl_reflect_as_list!(
    {T: TypePath} Vec<T>,
    {T: TypePath} Box<[T]>,
    {T: TypePath, const N: usize} [T; N],
    {T: TypePath} VecDeque<T>,
    {T: TypePath} BTreeSet<T>,
    {T: TypePath, S: 'static} std::collections::HashSet<T, S>,
    {T: TypePath, S: 'static} jv_utils::hash::HashSet<T, S>,
);

// -----------------------------------------------------------------------------
// Maps

macro_rules! impl_reflect_map {
    ($({$($generics:tt)*} $ty:ty),* $(,)?) => {$(
        impl<$($generics)*> Map for $ty {
            #[inline]
            fn len(&self) -> usize {
                Self::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (Cow<'_, str>, &dyn Reflect)> + '_> {
                Box::new(Self::iter(self).map(|(key, value)| (key.key_str(), value as &dyn Reflect)))
            }
        }

        impl<$($generics)*> TypePath for $ty {
            #[inline]
            fn element_type() -> Type {
                V::element_type()
            }
        }

        impl<$($generics)*> Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }
        }
    )*};
}

impl_reflect_map!(
    {K: MapKey + 'static, V: Reflect + TypePath} BTreeMap<K, V>,
    {K: MapKey + 'static, V: Reflect + TypePath, S: BuildHasher + 'static} std::collections::HashMap<K, V, S>,
    {K: MapKey + 'static, V: Reflect + TypePath, S: BuildHasher + 'static} jv_utils::hash::HashMap<K, V, S>,
);
