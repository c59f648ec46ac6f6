use alloc::borrow::Cow;
use alloc::string::String;

use crate::info::TypePath;
use crate::{Reflect, ReflectRef};

macro_rules! impl_reflect_number {
    ($variant:ident as $cast:ty: $($ty:ty),* $(,)?) => {$(
        impl TypePath for $ty {}

        impl Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::$variant(*self as $cast)
            }
        }
    )*};
}

impl_reflect_number!(Int as i64: i8, i16, i32, i64, isize);
impl_reflect_number!(UInt as u64: u8, u16, u32, u64, usize);
impl_reflect_number!(Float as f64: f64);

// Widening would print `f32` values with spurious digits, and 128-bit
// integers do not fit the number variants; serde handles both.
crate::impl_reflect_opaque!(f32, i128, u128);

impl TypePath for bool {}

impl Reflect for bool {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Bool(*self)
    }
}

impl TypePath for char {}

impl Reflect for char {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Char(*self)
    }
}

impl TypePath for () {}

impl Reflect for () {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Null
    }
}

impl TypePath for String {}

impl Reflect for String {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Str(self)
    }
}

impl TypePath for &'static str {}

impl Reflect for &'static str {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Str(self)
    }
}

impl TypePath for Cow<'static, str> {}

impl Reflect for Cow<'static, str> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Str(self)
    }
}
