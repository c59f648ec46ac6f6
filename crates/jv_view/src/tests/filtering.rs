use serde_json::json;

use super::models::{
    Labeled, TestChildObject, TestInterface, TestObject, TestSubobject, TestUnrelatedObject,
};
use super::{sample, write};
use crate::{ConfigError, Match, Resolution, View, ViewEngine};

fn unrelated() -> TestUnrelatedObject {
    TestUnrelatedObject {
        id: 1,
        name: "unrelated".into(),
    }
}

/// Three nested objects linked through `recursion`.
fn recursive() -> TestObject {
    let inner = TestObject {
        str1: Some("e".into()),
        str2: Some("f".into()),
        ..TestObject::default()
    };
    let middle = TestObject {
        int1: 2,
        str1: Some("c".into()),
        str2: Some("d".into()),
        recursion: Some(Box::new(inner)),
        ..TestObject::default()
    };
    TestObject {
        int1: 1,
        str1: Some("a".into()),
        str2: Some("b".into()),
        recursion: Some(Box::new(middle)),
        ..TestObject::default()
    }
}

fn recursion_rules() -> Match {
    Match::new()
        .exclude(["*"])
        .include(["int1", "str1", "str2", "recursion", "recursion.str1", "recursion.recursion.str2"])
}

#[test]
fn without_rules_every_property_is_written() {
    let value = unrelated();
    assert_eq!(write(&View::of(&value)), json!({"id": 1, "name": "unrelated"}));
}

#[test]
fn include_overrides_blanket_exclude() {
    let value = unrelated();
    let view = View::of(&value)
        .on_type::<TestUnrelatedObject>(Match::new().exclude(["*"]).include(["id"]))
        .unwrap();
    assert_eq!(write(&view), json!({"id": 1}));
}

#[test]
fn exact_exclude_beats_wildcard_include() {
    let value = unrelated();
    let view = View::of(&value)
        .on_type::<TestUnrelatedObject>(Match::new().include(["*"]).exclude(["name"]))
        .unwrap();
    assert_eq!(write(&view), json!({"id": 1}));
}

#[test]
fn exact_include_beats_exact_exclude() {
    let value = unrelated();
    let view = View::of(&value)
        .on_type::<TestUnrelatedObject>(Match::new().include(["name"]).exclude(["name", "id"]))
        .unwrap();
    assert_eq!(write(&view), json!({"name": "unrelated"}));
}

#[test]
fn nested_property_excluded_by_path() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["sub.val"]))
        .unwrap();
    let out = write(&view);

    assert_eq!(out["sub"]["other_val"], "other");
    assert!(out["sub"].get("val").is_none());
    assert_eq!(out["sub"]["sub"]["val"], "subsub");
    assert_eq!(out["sub_with_ignores"]["other_val"], "kept");
}

#[test]
fn nested_include_opens_the_path_to_it() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["*"]).include(["str1", "sub.val"]))
        .unwrap();
    assert_eq!(write(&view), json!({"str1": "str1", "sub": {"val": "sub"}}));
}

#[test]
fn list_elements_share_the_list_path() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["list_of_objects.val"]))
        .unwrap();
    let out = write(&view);

    assert_eq!(
        out["list_of_objects"],
        json!([{"other_val": null, "sub": null}, {"other_val": null, "sub": null}])
    );
}

#[test]
fn map_values_extend_the_path_with_their_key() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["map_of_objects.first.val"]))
        .unwrap();
    let out = write(&view);

    assert!(out["map_of_objects"]["first"].get("val").is_none());
    assert_eq!(out["map_of_objects"]["second"]["val"], "two");
}

#[test]
fn type_rules_restart_the_path() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["sub.val"]))
        .unwrap()
        .on_type::<TestSubobject>(Match::new().exclude(["other_val"]))
        .unwrap();
    let out = write(&view);

    assert_eq!(out["sub"]["val"], "sub");
    assert!(out["sub"].get("other_val").is_none());
    assert_eq!(out["sub"]["sub"], json!({"val": "subsub", "sub": null}));
}

#[test]
fn path_first_keeps_the_inherited_rules() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["sub.val"]))
        .unwrap()
        .on_type::<TestSubobject>(Match::new().exclude(["other_val"]))
        .unwrap()
        .with_resolution(Resolution::PathFirst);
    let out = write(&view);

    assert!(out["sub"].get("val").is_none());
    assert_eq!(out["sub"]["other_val"], "other");
}

#[test]
fn path_first_follows_recursion() {
    let value = recursive();
    let view = View::of(&value)
        .on_type::<TestObject>(recursion_rules())
        .unwrap()
        .with_resolution(Resolution::PathFirst);

    assert_eq!(
        write(&view),
        json!({
            "int1": 1,
            "str1": "a",
            "str2": "b",
            "recursion": {
                "str1": "c",
                "recursion": {"str2": "f"}
            }
        })
    );
}

#[test]
fn type_first_applies_rules_afresh_at_every_level() {
    let value = recursive();
    let view = View::of(&value).on_type::<TestObject>(recursion_rules()).unwrap();

    assert_eq!(
        write(&view),
        json!({
            "int1": 1,
            "str1": "a",
            "str2": "b",
            "recursion": {
                "int1": 2,
                "str1": "c",
                "str2": "d",
                "recursion": {"int1": 0, "str1": "e", "str2": "f", "recursion": null}
            }
        })
    );
}

#[test]
fn engine_resolution_is_used_unless_the_view_overrides_it() {
    let value = recursive();
    let mut engine = ViewEngine::new();
    engine.set_default_resolution(Resolution::PathFirst);

    let view = View::of(&value).on_type::<TestObject>(recursion_rules()).unwrap();
    let out = engine.to_value(&view).unwrap();
    assert_eq!(out["recursion"], json!({"str1": "c", "recursion": {"str2": "f"}}));

    let view = view.with_resolution(Resolution::TypeFirst);
    let out = engine.to_value(&view).unwrap();
    assert_eq!(out["recursion"]["int1"], 2);
}

#[test]
fn subtype_uses_rules_of_its_supertype() {
    let value = TestChildObject {
        base: sample(),
        child_field: Some("child".into()),
    };
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["*"]).include(["str1"]))
        .unwrap();
    assert_eq!(write(&view), json!({"str1": "str1"}));
}

#[test]
fn rules_of_related_types_are_combined() {
    let value = TestChildObject {
        base: sample(),
        child_field: Some("child".into()),
    };
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["*"]).include(["str1"]))
        .unwrap()
        .on_type::<TestChildObject>(Match::new().include(["child_field"]))
        .unwrap();
    assert_eq!(write(&view), json!({"str1": "str1", "child_field": "child"}));
}

#[test]
fn subtype_include_beats_supertype_exclude() {
    let value = TestChildObject {
        base: sample(),
        child_field: None,
    };
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["str1"]))
        .unwrap()
        .on_type::<TestChildObject>(Match::new().include(["str1"]))
        .unwrap();
    assert_eq!(write(&view)["str1"], "str1");
}

#[test]
fn interface_rules_apply_to_implementors() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<dyn TestInterface>(Match::new().exclude(["date"]))
        .unwrap();
    let out = write(&view);

    assert!(out.get("date").is_none());
    assert_eq!(out["str1"], "str1");
}

#[test]
fn transforms_replace_values() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(
            Match::new()
                .transform("str1", |_: &TestObject, v: &String| v.to_uppercase())
                .transform("str2", |o: &TestObject, _: &String| o.str1.clone()),
        )
        .unwrap();
    let out = write(&view);

    assert_eq!(out["str1"], "STR1");
    assert_eq!(out["str2"], "str1");
}

#[test]
fn transforms_on_nested_paths_receive_the_nested_owner() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(
            Match::new().transform("sub.val", |s: &TestSubobject, v: &String| {
                format!("{v}/{}", s.other_val.as_deref().unwrap_or("-"))
            }),
        )
        .unwrap();
    let out = write(&view);

    assert_eq!(out["sub"]["val"], "sub/other");
    assert_eq!(out["sub"]["sub"]["val"], "subsub");
}

#[test]
fn failing_transform_reports_the_path() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().transform("int1", |_: &TestObject, v: &String| v.clone()))
        .unwrap();
    let err = ViewEngine::new().to_string(&view).unwrap_err();
    assert!(err.to_string().contains("`int1`"), "{err}");
}

#[test]
fn paths_below_a_renamed_property_use_its_output_name() {
    let value = Labeled {
        label: "label".into(),
        nested: Some(TestSubobject::new("val")),
        ..Labeled::default()
    };
    let view = View::of(&value)
        .on_type::<Labeled>(Match::new().exclude(["label", "child.val"]))
        .unwrap();
    let out = write(&view);

    assert!(out.get("title").is_none());
    assert!(out.get("label").is_none());
    assert_eq!(out["child"], json!({"other_val": null, "sub": null}));
}

#[test]
fn explicit_include_overrides_ignore_tags() {
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().include(["ignored_direct"]))
        .unwrap();
    let out = write(&view);

    assert_eq!(out["ignored_direct"], "direct");
    assert!(out.get("ignored_indirect").is_none());
    assert!(out.get("ignored_value").is_none());
}

#[test]
fn rules_attached_by_type_name() {
    let mut registry = jv_reflect::registry::TypeRegistry::new();
    registry.register::<TestUnrelatedObject>();

    let value = unrelated();
    let view = View::of(&value)
        .on_type_name(&registry, "TestUnrelatedObject", Match::new().exclude(["name"]))
        .unwrap();
    assert_eq!(write(&view), json!({"id": 1}));

    let err = View::of(&value)
        .on_type_name(&registry, "Missing", Match::new())
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownType(name) if name == "Missing"));
}

#[test]
fn rules_attach_once_per_type() {
    let value = unrelated();
    let err = View::of(&value)
        .on_type::<TestUnrelatedObject>(Match::new())
        .unwrap()
        .on_type::<TestUnrelatedObject>(Match::new().exclude(["id"]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateRules(_)));
}

#[test]
fn related_types_cannot_transform_the_same_path() {
    let value = sample();
    let err = View::of(&value)
        .on_type::<TestObject>(Match::new().transform("str1", |_: &TestObject, v: &String| v.clone()))
        .unwrap()
        .on_type::<TestChildObject>(
            Match::new().transform("str1", |_: &TestChildObject, v: &String| v.clone()),
        )
        .unwrap_err();
    assert!(matches!(err, ConfigError::TransformCollision { .. }));
}
