use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use jv_utils::TypeIdMap;

use crate::info::{CustomAttributes, FieldInfo, MethodInfo, Type, TypePath, Typed, Visibility};
use crate::{AccessError, ProjectFn, PropertyValue, Reflect};

// -----------------------------------------------------------------------------
// Casting helpers

/// Recovers `&T` from a reflected owner.
pub type Cast<T> = for<'a> fn(&'a dyn Reflect) -> Option<&'a T>;

/// Downcasts a reflected value to a concrete type.
#[inline]
pub fn downcast<'a, T: Reflect>(value: &'a dyn Reflect) -> Option<&'a T> {
    value.downcast_ref::<T>()
}

/// Views a reflected value as the interface `I`.
///
/// Uses the casters registered with [`TypeBuilder::implements`] on the
/// value's type or on one of its parents.
#[inline]
pub fn interface_cast<'a, I: ?Sized + 'static>(value: &'a dyn Reflect) -> Option<&'a I> {
    value.reflect_type_info()?.cast::<I>(value)
}

/// A type-erased upcast from an implementing type to the interface `I`.
pub struct Caster<I: ?Sized + 'static>(
    Arc<dyn for<'a> Fn(&'a dyn Reflect) -> Option<&'a I> + Send + Sync>,
);

impl<I: ?Sized + 'static> Caster<I> {
    /// Wraps a cast function.
    #[inline]
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a dyn Reflect) -> Option<&'a I> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn cast<'a>(&self, value: &'a dyn Reflect) -> Option<&'a I> {
        (self.0)(value)
    }
}

// -----------------------------------------------------------------------------
// Links

/// The parent of a class, with the projection from a child value to its
/// parent part.
#[derive(Clone)]
pub struct ParentLink {
    info: fn() -> &'static TypeInfo,
    project: Arc<ProjectFn>,
}

impl ParentLink {
    /// The parent's type information.
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    /// Projects a child value to its parent part.
    #[inline]
    pub fn project<'a>(&self, child: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        (self.project)(child)
    }

    /// The projection function itself.
    #[inline]
    pub fn projection(&self) -> &Arc<ProjectFn> {
        &self.project
    }
}

/// An interface implemented by a class, or extended by an interface.
///
/// The info is behind a function pointer so that type information is only
/// created on first access; this keeps mutually referring types from
/// recursing during initialization.
#[derive(Clone, Copy)]
pub struct InterfaceLink {
    info: fn() -> &'static TypeInfo,
}

impl InterfaceLink {
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Whether a type is a concrete class or an interface (a trait object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
}

/// Compile-time information about a structured type.
///
/// Holds the declared fields and methods in declaration order, the parent
/// class (an embedded value the type extends), the implemented or extended
/// interfaces and type-level custom attributes.
///
/// # Examples
///
/// ```
/// use jv_reflect::info::{TypeInfo, TypeInfoCell, TypeKind, Typed, Visibility};
///
/// struct Base {
///     id: u64,
/// }
///
/// struct User {
///     base: Base,
///     name: String,
/// }
///
/// impl Typed for Base {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::class::<Self>().field("id", |b| &b.id).build())
///     }
/// }
///
/// impl Typed for User {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::class::<Self>()
///                 .extends::<Base>(|u| &u.base)
///                 .getter("getName", |u| &u.name)
///                 .build()
///         })
///     }
/// }
///
/// jv_reflect::impl_reflect_object!(Base, User);
///
/// let info = User::type_info();
/// assert_eq!(info.kind(), TypeKind::Class);
/// assert_eq!(info.parent().map(|p| p.type_name()), Some("Base"));
/// assert_eq!(info.method("getName").map(|m| m.visibility()), Some(Visibility::Public));
/// ```
pub struct TypeInfo {
    ty: Type,
    kind: TypeKind,
    parent: Option<ParentLink>,
    interfaces: Box<[InterfaceLink]>,
    casters: TypeIdMap<Arc<dyn Any + Send + Sync>>,
    fields: Box<[FieldInfo]>,
    methods: Box<[MethodInfo]>,
    custom_attributes: Option<Arc<CustomAttributes>>,
}

impl TypeInfo {
    /// Starts describing the class `T`.
    #[inline]
    pub fn class<T: Reflect + TypePath>() -> TypeBuilder<T> {
        TypeBuilder::new(TypeKind::Class, downcast::<T>)
    }

    /// Starts describing the interface `I`, usually a `dyn Trait`.
    #[inline]
    pub fn interface<I: ?Sized + TypePath>() -> TypeBuilder<I> {
        TypeBuilder::new(TypeKind::Interface, interface_cast::<I>)
    }

    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// The parent class, if this class extends one.
    #[inline]
    pub fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent.as_ref().map(ParentLink::info)
    }

    #[inline]
    pub fn parent_link(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    /// The directly implemented (or, for interfaces, extended) interfaces.
    #[inline]
    pub fn interfaces(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.interfaces.iter().map(InterfaceLink::info)
    }

    /// The declared fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Returns the declared field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// The declared methods in declaration order.
    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Returns the declared method with the given name.
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Views `value`, an instance of this type, as the interface `I`.
    ///
    /// Falls back to the parent part when this type does not implement `I`
    /// itself.
    pub fn cast<'a, I: ?Sized + 'static>(&self, value: &'a dyn Reflect) -> Option<&'a I> {
        if let Some(caster) = self.casters.get(&TypeId::of::<I>()) {
            return caster.downcast_ref::<Caster<I>>()?.cast(value);
        }
        let parent = self.parent.as_ref()?;
        parent.info().cast::<I>(parent.project(value)?)
    }

    crate::info::impl_custom_attributes_fn!(custom_attributes);
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("ty", &self.ty)
            .field("kind", &self.kind)
            .field("parent", &self.parent.as_ref().map(|p| p.info().ty))
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeBuilder

/// Builder for [`TypeInfo`].
///
/// Readers are plain function pointers over `&T`; the builder wraps them
/// with the cast from a reflected owner.
pub struct TypeBuilder<T: ?Sized + 'static> {
    ty: Type,
    kind: TypeKind,
    cast: Cast<T>,
    parent: Option<ParentLink>,
    interfaces: Vec<InterfaceLink>,
    casters: TypeIdMap<Arc<dyn Any + Send + Sync>>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    custom_attributes: CustomAttributes,
}

impl<T: ?Sized + TypePath> TypeBuilder<T> {
    fn new(kind: TypeKind, cast: Cast<T>) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
            cast,
            parent: None,
            interfaces: Vec::new(),
            casters: TypeIdMap::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            custom_attributes: CustomAttributes::new(),
        }
    }
}

impl<T: ?Sized + 'static> TypeBuilder<T> {
    /// Adds a type-level attribute.
    pub fn with_attribute<A: Any + Send + Sync>(mut self, value: A) -> Self {
        self.custom_attributes.insert(value);
        self
    }

    /// Adds a private field.
    #[inline]
    pub fn field<V: Reflect + TypePath>(self, name: &'static str, read: fn(&T) -> &V) -> Self {
        self.field_with(name, read, |f| f)
    }

    /// Adds a field and adjusts it through `configure`.
    pub fn field_with<V: Reflect + TypePath>(
        mut self,
        name: &'static str,
        read: fn(&T) -> &V,
        configure: impl FnOnce(FieldInfo) -> FieldInfo,
    ) -> Self {
        let reader = self.borrowed_reader(read);
        self.fields.push(configure(FieldInfo::new::<V>(name, reader)));
        self
    }

    /// Adds a public accessor returning a reference.
    #[inline]
    pub fn getter<V: Reflect + TypePath>(self, name: &'static str, read: fn(&T) -> &V) -> Self {
        self.getter_with(name, read, |m| m)
    }

    /// Adds an accessor returning a reference and adjusts it through `configure`.
    pub fn getter_with<V: Reflect + TypePath>(
        mut self,
        name: &'static str,
        read: fn(&T) -> &V,
        configure: impl FnOnce(MethodInfo) -> MethodInfo,
    ) -> Self {
        let reader = self.borrowed_reader(read);
        self.methods.push(configure(MethodInfo::getter::<V>(name, reader)));
        self
    }

    /// Adds a public accessor computing an owned value.
    #[inline]
    pub fn computed<V: Reflect + TypePath>(self, name: &'static str, compute: fn(&T) -> V) -> Self {
        self.computed_with(name, compute, |m| m)
    }

    /// Adds an accessor computing an owned value and adjusts it through `configure`.
    pub fn computed_with<V: Reflect + TypePath>(
        mut self,
        name: &'static str,
        compute: fn(&T) -> V,
        configure: impl FnOnce(MethodInfo) -> MethodInfo,
    ) -> Self {
        let cast = self.cast;
        let reader = crate::reader(move |owner| {
            let this = cast(owner).ok_or_else(|| AccessError::mismatch::<T>(owner))?;
            Ok(PropertyValue::Owned(Box::new(compute(this))))
        });
        self.methods.push(configure(MethodInfo::getter::<V>(name, reader)));
        self
    }

    /// Adds an already built method, such as a [`MethodInfo::signature`].
    #[inline]
    pub fn method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    /// Declares that this interface extends the interface `I`.
    #[inline]
    pub fn extends_interface<I: ?Sized + Typed>(mut self) -> Self {
        self.interfaces.push(InterfaceLink { info: I::type_info });
        self
    }

    /// Finishes the description.
    pub fn build(self) -> TypeInfo {
        let custom_attributes = if self.custom_attributes.is_empty() {
            None
        } else {
            Some(Arc::new(self.custom_attributes))
        };
        TypeInfo {
            ty: self.ty,
            kind: self.kind,
            parent: self.parent,
            interfaces: self.interfaces.into_boxed_slice(),
            casters: self.casters,
            fields: self.fields.into_boxed_slice(),
            methods: self.methods.into_boxed_slice(),
            custom_attributes,
        }
    }

    fn borrowed_reader<V: Reflect>(&self, read: fn(&T) -> &V) -> Arc<crate::ReadFn> {
        let cast = self.cast;
        crate::reader(move |owner| {
            let this = cast(owner).ok_or_else(|| AccessError::mismatch::<T>(owner))?;
            Ok(PropertyValue::Borrowed(read(this)))
        })
    }
}

impl<T: Reflect + TypePath> TypeBuilder<T> {
    /// Declares that this class extends `P`, embedded in `T` and reached
    /// through `project`.
    ///
    /// Fields and methods declared on `P` become properties of `T`.
    pub fn extends<P: Reflect + Typed>(mut self, project: fn(&T) -> &P) -> Self {
        let cast = self.cast;
        self.parent = Some(ParentLink {
            info: P::type_info,
            project: crate::projection(move |child| {
                cast(child).map(|this| project(this) as &dyn Reflect)
            }),
        });
        self
    }

    /// Declares that this class implements the interface `I`.
    ///
    /// `upcast` is usually `|t| t`, relying on unsized coercion.
    pub fn implements<I: ?Sized + Typed>(mut self, upcast: fn(&T) -> &I) -> Self {
        let cast = self.cast;
        let caster = Caster::<I>::new(move |value| cast(value).map(upcast));
        self.interfaces.push(InterfaceLink { info: I::type_info });
        self.casters.insert(TypeId::of::<I>(), Arc::new(caster));
        self
    }

    /// Adds a public field.
    #[inline]
    pub fn public_field<V: Reflect + TypePath>(self, name: &'static str, read: fn(&T) -> &V) -> Self {
        self.field_with(name, read, |f| f.with_visibility(Visibility::Public))
    }
}
