//! Property discovery.
//!
//! The properties of a type are its fields and accessors, gathered from
//! the type and all its ancestors, filtered by the type's [`AutoDetect`]
//! policy and merged by logical name.

use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use jv_reflect::info::{CustomAttributes, FieldInfo, MethodInfo, Type, TypeInfo, Visibility};
use jv_reflect::{AccessError, PropertyValue, ReadFn, Reflect};
use jv_utils::hash::HashMap;

use crate::attrs::{AutoDetect, Rename};
use crate::hierarchy::Ancestor;

// -----------------------------------------------------------------------------
// PropertyId

/// Identifies a property: the type whose property list holds it and its
/// position in that list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId {
    pub owner: TypeId,
    pub index: usize,
}

// -----------------------------------------------------------------------------
// PropertySource

/// The member a property is read through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertySource {
    Field,
    Accessor,
}

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// One readable property of a type.
#[derive(Clone)]
pub struct PropertyDescriptor {
    id: PropertyId,
    name: Cow<'static, str>,
    output_name: Cow<'static, str>,
    owner: &'static TypeInfo,
    declaring: &'static TypeInfo,
    value_type: Option<Type>,
    source: PropertySource,
    member: &'static str,
    visibility: Visibility,
    attributes: Arc<CustomAttributes>,
    reader: Arc<ReadFn>,
}

impl PropertyDescriptor {
    #[inline]
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// The logical name, matched against rule patterns.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name written to the output, after [`Rename`].
    #[inline]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// The type this property was computed for.
    #[inline]
    pub fn owner(&self) -> &'static TypeInfo {
        self.owner
    }

    /// The type declaring the member the property is read through.
    #[inline]
    pub fn declaring(&self) -> &'static TypeInfo {
        self.declaring
    }

    /// The type the value refers to once containers are unwrapped.
    #[inline]
    pub fn value_type(&self) -> Option<Type> {
        self.value_type
    }

    #[inline]
    pub fn source(&self) -> PropertySource {
        self.source
    }

    /// The name of the field or accessor.
    #[inline]
    pub fn member(&self) -> &'static str {
        self.member
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The union of the tags of the field and the accessor.
    #[inline]
    pub fn attributes(&self) -> &CustomAttributes {
        &self.attributes
    }

    #[inline]
    pub fn get_attribute<T: core::any::Any>(&self) -> Option<&T> {
        self.attributes.get::<T>()
    }

    #[inline]
    pub fn has_attribute<T: core::any::Any>(&self) -> bool {
        self.attributes.contains::<T>()
    }

    /// Reads the property from a value of the owner type.
    #[inline]
    pub fn read<'a>(&self, owner: &'a dyn Reflect) -> Result<PropertyValue<'a>, AccessError> {
        (self.reader)(owner)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("output_name", &self.output_name)
            .field("owner", &self.owner.type_path())
            .field("declaring", &self.declaring.type_path())
            .field("source", &self.source)
            .field("member", &self.member)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Discovery

enum Member {
    Field(&'static FieldInfo),
    Accessor(&'static MethodInfo),
}

struct Candidate<'w> {
    name: Cow<'static, str>,
    member: Member,
    ancestor: &'w Ancestor,
    attributes: Cow<'static, CustomAttributes>,
}

/// Computes the properties of `info`, given its [`ancestors`].
///
/// Fields come first in declaration order, the type's own before its
/// parent's, followed by accessor-only properties. An accessor named like
/// a field replaces it in place when the policy lets accessors through;
/// either way the tags of both are merged. Static members never become
/// properties.
///
/// [`ancestors`]: crate::hierarchy::ancestors
pub fn properties_of(info: &'static TypeInfo, ancestors: &[Ancestor]) -> Vec<PropertyDescriptor> {
    let policy = info.get_attribute::<AutoDetect>().copied().unwrap_or_default();

    let mut candidates: Vec<Candidate<'_>> = Vec::new();
    let mut by_name = HashMap::<Cow<'static, str>, usize>::default();

    for ancestor in ancestors.iter().filter(|a| !a.info().is_interface()) {
        for field in ancestor.info().fields().iter().filter(|f| !f.is_static()) {
            let name = Cow::Borrowed(field.name());
            if by_name.contains_key(&name) {
                continue;
            }
            by_name.insert(name.clone(), candidates.len());
            candidates.push(Candidate {
                name,
                member: Member::Field(field),
                ancestor,
                attributes: Cow::Borrowed(field.custom_attributes()),
            });
        }
    }

    let mut accessors = HashMap::<Cow<'static, str>, ()>::default();
    for ancestor in ancestors {
        for method in ancestor.info().methods() {
            if method.is_static() || !method.is_getter() {
                continue;
            }
            let name = method.property_name();
            if accessors.insert(name.clone(), ()).is_some() {
                continue;
            }
            let visible = policy.getter_visible(method.visibility());

            match by_name.get(&name).copied() {
                Some(index) => {
                    let candidate = &mut candidates[index];
                    let merged = candidate.attributes.merged(method.custom_attributes());
                    candidate.attributes = Cow::Owned(merged);
                    if visible {
                        candidate.member = Member::Accessor(method);
                        candidate.ancestor = ancestor;
                    }
                }
                None if visible => {
                    by_name.insert(name.clone(), candidates.len());
                    candidates.push(Candidate {
                        name,
                        member: Member::Accessor(method),
                        ancestor,
                        attributes: Cow::Borrowed(method.custom_attributes()),
                    });
                }
                None => {}
            }
        }
    }

    candidates
        .into_iter()
        .filter(|c| match c.member {
            Member::Field(field) => policy.field_visible(field.visibility()),
            Member::Accessor(_) => true,
        })
        .enumerate()
        .map(|(index, c)| describe(info, index, c))
        .collect()
}

fn describe(owner: &'static TypeInfo, index: usize, candidate: Candidate<'_>) -> PropertyDescriptor {
    let Candidate {
        name,
        member,
        ancestor,
        attributes,
    } = candidate;

    let (source, member_name, visibility, value_type, reader) = match member {
        Member::Field(field) => (
            PropertySource::Field,
            field.name(),
            field.visibility(),
            Some(field.element_type()),
            Some(field.reader().clone()),
        ),
        Member::Accessor(method) => (
            PropertySource::Accessor,
            method.name(),
            method.visibility(),
            method.element_type(),
            method.reader().cloned(),
        ),
    };

    let output_name = match attributes.get::<Rename>().and_then(Rename::name) {
        Some(rename) => Cow::Owned(rename.into()),
        None => name.clone(),
    };

    PropertyDescriptor {
        id: PropertyId {
            owner: owner.type_id(),
            index,
        },
        name,
        output_name,
        owner,
        declaring: ancestor.info(),
        value_type,
        source,
        member: member_name,
        visibility,
        attributes: Arc::new(attributes.into_owned()),
        reader: through(ancestor, owner, member_name, reader),
    }
}

/// Builds the reader of a member declared on `ancestor`, taking values of
/// the owner type.
fn through(
    ancestor: &Ancestor,
    owner: &'static TypeInfo,
    member: &'static str,
    reader: Option<Arc<ReadFn>>,
) -> Arc<ReadFn> {
    let Some(reader) = reader else {
        let owner = owner.type_path();
        return jv_reflect::reader(move |_| Err(AccessError::NoReader { owner, member }));
    };
    let Some(project) = ancestor.projection().cloned() else {
        return reader;
    };
    let declaring = ancestor.info().type_path();
    jv_reflect::reader(move |value| {
        let part = project(value).ok_or_else(|| AccessError::Projection {
            ancestor: declaring,
            found: value.reflect_type_path(),
        })?;
        reader(part)
    })
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use jv_reflect::info::{MethodInfo, TypeInfo, TypeInfoCell, Typed};

    use super::*;
    use crate::attrs::{Detect, Ignore};
    use crate::hierarchy::ancestors;

    fn props(info: &'static TypeInfo) -> Vec<PropertyDescriptor> {
        properties_of(info, &ancestors(info))
    }

    fn names(props: &[PropertyDescriptor]) -> Vec<&str> {
        props.iter().map(PropertyDescriptor::name).collect()
    }

    struct Plain {
        id: u32,
        label: String,
    }

    impl Typed for Plain {
        fn type_info() -> &'static TypeInfo {
            static CELL: TypeInfoCell = TypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>()
                    .field("id", |p| &p.id)
                    .field_with("label", |p| &p.label, |f| f.with_attribute(Ignore(true)))
                    .getter("getLabel", |p| &p.label)
                    .getter("getId", |p| &p.id)
                    .computed("getDouble", |p| p.id * 2)
                    .method(MethodInfo::signature("getCount", 1, None))
                    .method(MethodInfo::signature("reset", 0, None))
                    .computed_with("getVersion", |_| 3_u8, |m| m.with_static(true))
                    .build()
            })
        }
    }

    struct Fields {
        visible: u32,
        hidden: u32,
    }

    impl Typed for Fields {
        fn type_info() -> &'static TypeInfo {
            static CELL: TypeInfoCell = TypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>()
                    .with_attribute(
                        AutoDetect::new()
                            .with_fields(Detect::PublicOnly)
                            .with_getters(Detect::None),
                    )
                    .public_field("visible", |f| &f.visible)
                    .field("hidden", |f| &f.hidden)
                    .getter_with("getHidden", |f| &f.hidden, |m| m.with_attribute(Rename::new("shown")))
                    .build()
            })
        }
    }

    struct Derived {
        base: Plain,
        extra: bool,
    }

    impl Typed for Derived {
        fn type_info() -> &'static TypeInfo {
            static CELL: TypeInfoCell = TypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>()
                    .with_attribute(AutoDetect::new().with_fields(Detect::Any))
                    .extends::<Plain>(|d| &d.base)
                    .field("extra", |d| &d.extra)
                    .computed("getId", |d| d.base.id + 100)
                    .build()
            })
        }
    }

    jv_reflect::impl_reflect_object!(Plain, Fields, Derived);

    #[test]
    fn accessors_by_default() {
        let props = props(Plain::type_info());
        assert_eq!(names(&props), ["id", "label", "double"]);
        assert!(props.iter().all(|p| p.source() == PropertySource::Accessor));
        assert_eq!(props[0].member(), "getId");
    }

    #[test]
    fn tags_are_merged() {
        let props = props(Plain::type_info());
        assert!(props[1].has_attribute::<Ignore>());
        assert!(!props[0].has_attribute::<Ignore>());
    }

    #[test]
    fn field_policy_and_merged_rename() {
        let props = props(Fields::type_info());
        assert_eq!(names(&props), ["visible"]);
        assert_eq!(props[0].source(), PropertySource::Field);

        // the accessor is hidden, so the private field it merged into is dropped too
        assert!(props.iter().all(|p| p.output_name() != "shown"));
    }

    #[test]
    fn inherited_members() {
        let props = props(Derived::type_info());
        assert_eq!(names(&props), ["extra", "id", "label", "double"]);

        let value = Derived {
            base: Plain {
                id: 1,
                label: String::from("l"),
            },
            extra: true,
        };
        let id = props[1].read(&value).unwrap();
        assert_eq!(id.downcast_ref::<u32>(), Some(&101));
        assert_eq!(props[1].declaring().type_name(), "Derived");

        let label = props[2].read(&value).unwrap();
        assert_eq!(label.downcast_ref::<String>().map(String::as_str), Some("l"));
        assert_eq!(props[2].declaring().type_name(), "Plain");
        assert_eq!(props[2].owner().type_name(), "Derived");
    }

    #[test]
    fn projection_failure_is_reported() {
        let props = props(Derived::type_info());
        let err = props[2].read(&5_u32).unwrap_err();
        assert!(matches!(err, AccessError::Projection { .. }));
    }

    #[test]
    fn ids_follow_positions() {
        let props = props(Plain::type_info());
        for (index, prop) in props.iter().enumerate() {
            assert_eq!(prop.id().index, index);
            assert_eq!(prop.id().owner, TypeId::of::<Plain>());
        }
    }
}
