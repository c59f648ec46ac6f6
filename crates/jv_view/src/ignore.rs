use jv_reflect::info::TypeInfo;

use crate::attrs::{BackReference, Ignore, IgnoreProperties, ManagedReference};
use crate::cache::MetadataCache;
use crate::introspect::PropertyDescriptor;

/// Returns `true` if the tags around `property` always leave it out.
///
/// `referring` is the property the owning object was reached through, if
/// any. A property is ignored when:
///
/// 1. it carries [`Ignore`];
/// 2. its declaring or owning type lists it in [`IgnoreProperties`];
/// 3. the referring property lists it in [`IgnoreProperties`];
/// 4. it is a [`BackReference`] and the referring property's declaring
///    type holds a [`ManagedReference`] to this property's declaring type.
pub(crate) fn resolve(
    cache: &MetadataCache,
    property: &PropertyDescriptor,
    referring: Option<&PropertyDescriptor>,
) -> bool {
    if property.get_attribute::<Ignore>().is_some_and(|ignore| ignore.0) {
        return true;
    }

    let name = property.name();
    let listed_by = |info: &TypeInfo| {
        info.get_attribute::<IgnoreProperties>()
            .is_some_and(|list| list.contains(name))
    };
    if listed_by(property.declaring()) || listed_by(property.owner()) {
        return true;
    }

    let Some(referring) = referring else {
        return false;
    };
    if referring
        .get_attribute::<IgnoreProperties>()
        .is_some_and(|list| list.contains(name))
    {
        return true;
    }

    property.has_attribute::<BackReference>() && {
        let target = property.declaring().ty();
        cache
            .properties_of(referring.declaring())
            .iter()
            .any(|sibling| {
                sibling.has_attribute::<ManagedReference>() && sibling.value_type() == Some(target)
            })
    }
}
