use alloc::sync::Arc;
use core::any::{Any, TypeId};

use jv_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// CustomAttributes

/// A collection of custom attributes for a type, field or method.
///
/// Attributes are stored by their [`TypeId`], so there can only be one
/// attribute per type. The serializer reads its metadata tags (ignore,
/// rename, reference roles, ...) from here.
///
/// # Example
///
/// ```
/// use jv_reflect::info::CustomAttributes;
///
/// struct Label(&'static str);
///
/// let attrs = CustomAttributes::new().with_attribute(Label("id")).with_attribute(3_u8);
///
/// assert_eq!(attrs.get::<Label>().map(|l| l.0), Some("id"));
/// assert!(attrs.contains::<u8>());
/// assert!(!attrs.contains::<u16>());
/// ```
#[derive(Default, Clone)]
pub struct CustomAttributes {
    attributes: TypeIdMap<Arc<dyn Any + Send + Sync>>,
}

impl CustomAttributes {
    /// A static reference to an empty [`CustomAttributes`].
    ///
    /// Members store attributes as `Option<Arc<..>>` and hand this out when
    /// there are none.
    pub(crate) const EMPTY: &'static Self = &Self::new();

    /// Creates an empty [`CustomAttributes`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            attributes: TypeIdMap::new(),
        }
    }

    /// Adds an attribute, overwriting one of the same type.
    #[inline]
    pub fn with_attribute<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Adds an attribute, overwriting one of the same type.
    #[inline]
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.attributes.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Returns `true` if an attribute of type `T` is present.
    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.attributes.contains(&TypeId::of::<T>())
    }

    /// Returns the attribute of type `T`, if present.
    #[inline]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.attributes
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns the union of both collections.
    ///
    /// Where both hold an attribute of the same type, `other` wins.
    pub fn merged(&self, other: &Self) -> Self {
        let mut attributes = self.attributes.clone();
        for (id, value) in other.attributes.iter() {
            attributes.insert(*id, Arc::clone(value));
        }
        Self { attributes }
    }

    /// Returns the number of stored attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if no attributes are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl core::fmt::Debug for CustomAttributes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CustomAttributes")
            .field("len", &self.attributes.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implements `custom_attributes` and the `get_attribute` family.
macro_rules! impl_custom_attributes_fn {
    ($field:ident) => {
        /// Returns the custom attributes.
        #[inline]
        pub fn custom_attributes(&self) -> &$crate::info::CustomAttributes {
            match &self.$field {
                Some(ptr) => &**ptr,
                None => $crate::info::CustomAttributes::EMPTY,
            }
        }

        /// Returns the attribute of type `T`, if present.
        #[inline]
        pub fn get_attribute<T: ::core::any::Any>(&self) -> Option<&T> {
            self.custom_attributes().get::<T>()
        }

        /// Returns `true` if it contains the given attribute type.
        #[inline]
        pub fn has_attribute<T: ::core::any::Any>(&self) -> bool {
            self.custom_attributes().contains::<T>()
        }

        /// Adds an attribute, overwriting one of the same type.
        pub fn with_attribute<T: ::core::any::Any + Send + Sync>(mut self, value: T) -> Self {
            let mut attributes = match self.$field.take() {
                Some(ptr) => ::alloc::sync::Arc::unwrap_or_clone(ptr),
                None => $crate::info::CustomAttributes::new(),
            };
            attributes.insert(value);
            self.$field = Some(::alloc::sync::Arc::new(attributes));
            self
        }
    };
}

pub(crate) use impl_custom_attributes_fn;

#[cfg(test)]
mod tests {
    use super::CustomAttributes;

    #[test]
    fn merged_prefers_other() {
        let a = CustomAttributes::new().with_attribute(1_u8).with_attribute("a");
        let b = CustomAttributes::new().with_attribute(2_u8);

        let merged = a.merged(&b);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get::<u8>(), Some(&2));
        assert_eq!(merged.get::<&str>(), Some(&"a"));
    }
}
