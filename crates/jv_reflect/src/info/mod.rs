//! Static type information: [`TypeInfo`], its members and attributes.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod cell;
mod field_info;
mod method_info;
mod type_info;
mod type_path;
mod typed;
mod visibility;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use attributes::impl_custom_attributes_fn;

pub use attributes::CustomAttributes;
pub use cell::{GenericTypeInfoCell, TypeInfoCell};
pub use field_info::FieldInfo;
pub use method_info::{GETTER_PREFIX, MethodInfo};
pub use type_info::{Cast, Caster, InterfaceLink, ParentLink, TypeBuilder, TypeInfo, TypeKind};
pub use type_info::{downcast, interface_cast};
pub use type_path::{Type, TypePath};
pub use typed::Typed;
pub use visibility::Visibility;
