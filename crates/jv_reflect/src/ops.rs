//! Type-erased views over sequences and maps.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};

use crate::Reflect;

// -----------------------------------------------------------------------------
// List

/// An ordered sequence of reflected values: arrays, vectors and sets.
///
/// # Examples
///
/// ```
/// use jv_reflect::{Reflect, ReflectRef};
///
/// let items = vec![1_u8, 2, 3];
/// let ReflectRef::List(list) = items.reflect_ref() else { unreachable!() };
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.iter().count(), 3);
/// ```
pub trait List {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Iterates the elements in order.
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    /// Returns `true` if there are no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -----------------------------------------------------------------------------
// Map

/// An associative map whose keys can be written as strings.
pub trait Map {
    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Iterates the entries with their keys converted to strings.
    fn iter(&self) -> Box<dyn Iterator<Item = (Cow<'_, str>, &dyn Reflect)> + '_>;

    /// Returns `true` if there are no entries.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -----------------------------------------------------------------------------
// MapKey

/// A map key that can be written as a JSON object key.
pub trait MapKey {
    fn key_str(&self) -> Cow<'_, str>;
}

impl MapKey for String {
    #[inline]
    fn key_str(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl MapKey for &'static str {
    #[inline]
    fn key_str(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl MapKey for Cow<'static, str> {
    #[inline]
    fn key_str(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

macro_rules! impl_map_key_display {
    ($($ty:ty),* $(,)?) => {$(
        impl MapKey for $ty {
            #[inline]
            fn key_str(&self) -> Cow<'_, str> {
                Cow::Owned(self.to_string())
            }
        }
    )*};
}

impl_map_key_display!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);
