use crate::info::{TypeInfo, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to a type's [`TypeInfo`].
///
/// Implemented for structured types (classes) and for `dyn Trait`
/// interfaces. Use [`TypeInfoCell`] for non-generic types and
/// [`GenericTypeInfoCell`] for generic ones.
///
/// # Examples
///
/// An interface with a default accessor:
///
/// ```
/// use jv_reflect::info::{TypeInfo, TypeInfoCell, TypePath, Typed};
///
/// trait Named {
///     fn name(&self) -> String {
///         "NAME".to_owned()
///     }
/// }
///
/// impl TypePath for dyn Named {}
///
/// impl Typed for dyn Named {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::interface::<dyn Named>()
///                 .computed("getName", |n| n.name())
///                 .build()
///         })
///     }
/// }
///
/// assert!(<dyn Named>::type_info().is_interface());
/// ```
///
/// [`TypeInfoCell`]: crate::info::TypeInfoCell
/// [`GenericTypeInfoCell`]: crate::info::GenericTypeInfoCell
pub trait Typed: TypePath {
    /// Returns the type information, creating it on first access.
    fn type_info() -> &'static TypeInfo;
}
