//! Lookup of [`TypeInfo`] by type path or short name.

use core::any::TypeId;

use jv_utils::TypeIdMap;
use jv_utils::hash::{HashMap, HashSet};

use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of structured types, used to resolve type names given as
/// strings (from configuration, for example) to their [`TypeInfo`].
///
/// A short name shared by two registered types is ambiguous and can only be
/// resolved through the full path.
///
/// # Example
///
/// ```
/// use jv_reflect::info::{TypeInfo, TypeInfoCell, Typed};
/// use jv_reflect::registry::TypeRegistry;
///
/// struct Order {
///     id: u64,
/// }
///
/// impl Typed for Order {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::class::<Self>().field("id", |o| &o.id).build())
///     }
/// }
///
/// jv_reflect::impl_reflect_object!(Order);
///
/// let mut registry = TypeRegistry::new();
/// assert!(registry.register::<Order>());
///
/// let info = registry.get_with_type_name("Order").unwrap();
/// assert_eq!(info.type_path(), Order::type_info().type_path());
/// ```
pub struct TypeRegistry {
    infos: TypeIdMap<&'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            infos: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Registers `T`.
    ///
    /// Returns `false` if it was already registered.
    #[inline]
    pub fn register<T: ?Sized + Typed>(&mut self) -> bool {
        self.register_info(T::type_info())
    }

    /// Registers a type through its info.
    ///
    /// Returns `false` if it was already registered.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        if !self.infos.try_insert(info.type_id(), || info) {
            return false;
        }

        let name = info.type_name();
        if !self.ambiguous_names.contains(name) {
            if self.type_name_to_id.contains_key(name) {
                self.type_name_to_id.remove(name);
                self.ambiguous_names.insert(name);
            } else {
                self.type_name_to_id.insert(name, info.type_id());
            }
        }
        self.type_path_to_id.insert(info.type_path(), info.type_id());
        true
    }

    /// Returns `true` if the type is registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.infos.contains(&type_id)
    }

    /// Returns the info for a registered type.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.infos.get(&type_id).copied()
    }

    /// Returns the info for the type with the given full path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        self.get(*self.type_path_to_id.get(type_path)?)
    }

    /// Returns the info for the type with the given short name.
    ///
    /// Ambiguous names return `None`.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static TypeInfo> {
        self.get(*self.type_name_to_id.get(type_name)?)
    }

    /// Resolves a full path first, then a short name.
    pub fn resolve(&self, name: &str) -> Option<&'static TypeInfo> {
        self.get_with_type_path(name)
            .or_else(|| self.get_with_type_name(name))
    }

    /// Returns `true` if the short name is shared by several types.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Iterates the registered types in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.infos.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::info::{TypeInfo, TypeInfoCell, Typed};

    mod a {
        use super::*;

        pub struct Item;

        impl Typed for Item {
            fn type_info() -> &'static TypeInfo {
                static CELL: TypeInfoCell = TypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::class::<Self>().build())
            }
        }

        crate::impl_reflect_object!(Item);
    }

    mod b {
        use super::*;

        pub struct Item;

        impl Typed for Item {
            fn type_info() -> &'static TypeInfo {
                static CELL: TypeInfoCell = TypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::class::<Self>().build())
            }
        }

        crate::impl_reflect_object!(Item);
    }

    #[test]
    fn duplicate_registration_is_refused() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register::<a::Item>());
        assert!(!registry.register::<a::Item>());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn shared_short_names_are_ambiguous() {
        let mut registry = TypeRegistry::new();
        registry.register::<a::Item>();
        registry.register::<b::Item>();

        assert!(registry.is_ambiguous("Item"));
        assert!(registry.get_with_type_name("Item").is_none());

        let path = a::Item::type_info().type_path();
        assert!(registry.resolve(path).is_some());
    }
}
