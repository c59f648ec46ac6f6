use alloc::sync::Arc;

use crate::info::{CustomAttributes, Type, TypePath, Visibility};
use crate::{AccessError, PropertyValue, ReadFn, Reflect};

// -----------------------------------------------------------------------------
// FieldInfo

/// A declared field of a type.
///
/// Usually created through [`TypeBuilder::field`](crate::info::TypeBuilder::field).
#[derive(Clone)]
pub struct FieldInfo {
    name: &'static str,
    ty: Type,
    element: Type,
    visibility: Visibility,
    is_static: bool,
    reader: Arc<ReadFn>,
    custom_attributes: Option<Arc<CustomAttributes>>,
}

impl FieldInfo {
    /// Creates a private, non-static field of type `V`.
    pub fn new<V: Reflect + TypePath>(name: &'static str, reader: Arc<ReadFn>) -> Self {
        Self {
            name,
            ty: Type::of::<V>(),
            element: V::element_type(),
            visibility: Visibility::Private,
            is_static: false,
            reader,
            custom_attributes: None,
        }
    }

    /// Sets the visibility.
    #[inline]
    pub fn with_visibility(self, visibility: Visibility) -> Self {
        Self { visibility, ..self }
    }

    /// Marks the field as belonging to the type rather than its instances.
    #[inline]
    pub fn with_static(self, is_static: bool) -> Self {
        Self { is_static, ..self }
    }

    /// Replaces the attributes.
    pub fn with_custom_attributes(self, attributes: CustomAttributes) -> Self {
        let custom_attributes = if attributes.is_empty() {
            None
        } else {
            Some(Arc::new(attributes))
        };
        Self {
            custom_attributes,
            ..self
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type.
    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// The type the field refers to once containers are unwrapped.
    #[inline]
    pub fn element_type(&self) -> Type {
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
    pub fn reader(&self) -> &Arc<ReadFn> {
        &self.reader
    }

    /// Reads the field from its owner.
    #[inline]
    pub fn read<'a>(&self, owner: &'a dyn Reflect) -> Result<PropertyValue<'a>, AccessError> {
        (self.reader)(owner)
    }

    crate::info::impl_custom_attributes_fn!(custom_attributes);
}

impl core::fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}
