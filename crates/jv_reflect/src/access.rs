use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::ops::Deref;

use thiserror::Error;

use crate::Reflect;

// -----------------------------------------------------------------------------
// PropertyValue

/// The value read from a property.
///
/// Fields and borrowing accessors hand out a reference into the owner;
/// computing accessors return an owned value.
pub enum PropertyValue<'a> {
    Borrowed(&'a dyn Reflect),
    Owned(Box<dyn Reflect>),
}

impl Deref for PropertyValue<'_> {
    type Target = dyn Reflect;

    #[inline]
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => &**value,
        }
    }
}

impl core::fmt::Debug for PropertyValue<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&**self, f)
    }
}

// -----------------------------------------------------------------------------
// Reader and projection functions

/// Reads a property from its owner.
pub type ReadFn =
    dyn for<'a> Fn(&'a dyn Reflect) -> Result<PropertyValue<'a>, AccessError> + Send + Sync;

/// Projects a value to a part of it, such as the embedded parent of a type.
pub type ProjectFn = dyn for<'a> Fn(&'a dyn Reflect) -> Option<&'a dyn Reflect> + Send + Sync;

/// Boxes a closure as a [`ReadFn`].
///
/// Passing the closure through this function pins its signature to the
/// higher-ranked one, which plain `Arc::new` cannot infer.
#[inline]
pub fn reader<F>(f: F) -> Arc<ReadFn>
where
    F: for<'a> Fn(&'a dyn Reflect) -> Result<PropertyValue<'a>, AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Boxes a closure as a [`ProjectFn`].
#[inline]
pub fn projection<F>(f: F) -> Arc<ProjectFn>
where
    F: for<'a> Fn(&'a dyn Reflect) -> Option<&'a dyn Reflect> + Send + Sync + 'static,
{
    Arc::new(f)
}

// -----------------------------------------------------------------------------
// AccessError

/// An error raised when a property cannot be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    /// The owner is not of the type the reader was declared on.
    #[error("expected a value of type `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The member was declared without a way to read it.
    #[error("member `{member}` of `{owner}` cannot be read")]
    NoReader {
        owner: &'static str,
        member: &'static str,
    },
    /// The ancestor part of a value could not be reached.
    #[error("cannot reach `{ancestor}` from a value of type `{found}`")]
    Projection {
        ancestor: &'static str,
        found: &'static str,
    },
    #[error("{0}")]
    Custom(Cow<'static, str>),
}

impl AccessError {
    /// A [`TypeMismatch`](Self::TypeMismatch) for a value that is not a `T`.
    #[inline]
    pub fn mismatch<T: ?Sized>(found: &dyn Reflect) -> Self {
        Self::TypeMismatch {
            expected: core::any::type_name::<T>(),
            found: found.reflect_type_path(),
        }
    }

    /// A free-form error.
    #[inline]
    pub fn custom(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_value_derefs_to_content() {
        let number = 7_i32;
        let borrowed = PropertyValue::Borrowed(&number);
        let owned = PropertyValue::Owned(Box::new(String::from("x")));

        assert_eq!(borrowed.downcast_ref::<i32>(), Some(&7));
        assert_eq!(owned.downcast_ref::<String>().map(String::as_str), Some("x"));
    }

    #[test]
    fn mismatch_names_both_types() {
        let err = AccessError::mismatch::<String>(&1_u8);
        assert_eq!(
            err.to_string(),
            "expected a value of type `alloc::string::String`, found `u8`"
        );
    }
}
