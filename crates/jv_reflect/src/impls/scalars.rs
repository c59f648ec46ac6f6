use alloc::vec::Vec;
use core::ops::Deref;
use core::time::Duration;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::info::{Type, TypePath};
use crate::{Reflect, ReflectRef};

// Tree nodes of an already parsed document are written as they are.
crate::impl_reflect_opaque!(serde_json::Value, serde_json::Number);

crate::impl_reflect_opaque!(Duration, PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

impl TypePath for Type {}

/// A type identifier is written as its path.
impl Reflect for Type {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Str(self.path())
    }
}

// -----------------------------------------------------------------------------
// Bytes

/// A binary blob.
///
/// A plain `Vec<u8>` is a list of numbers; wrapping it in `Bytes` hands it
/// to the serializer's binary hook instead.
///
/// # Examples
///
/// ```
/// use jv_reflect::{Reflect, ReflectRef, impls::Bytes};
///
/// let blob = Bytes::from(vec![1, 2, 3]);
/// assert!(matches!(blob.reflect_ref(), ReflectRef::Bytes([1, 2, 3])));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Bytes {
    #[inline]
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl Deref for Bytes {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl TypePath for Bytes {}

impl Reflect for Bytes {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Bytes(&self.0)
    }
}
