use alloc::sync::Arc;

use jv_reflect::impls::Bytes;
use serde_json::json;

use super::models::{CustomType, Labeled, Node, TestNonNulls, TestNulls, TestObject};
use super::{sample, write};
use crate::cache::MetadataCache;
use crate::{ConfigError, Inclusion, Match, View, ViewConfig, ViewEngine};

#[test]
fn scalars_and_containers() {
    let value = TestObject {
        json_node: Some(json!({"nested": [1, 2]})),
        ..sample()
    };
    let out = write(&View::of(&value));

    assert_eq!(out["string_array"], json!(["a", "b"]));
    assert_eq!(out["list"], json!(["x", "y"]));
    assert_eq!(out["map_with_int_keys"], json!({"1": "one", "2": "two"}));
    assert_eq!(out["color"], "Green");
    assert_eq!(out["json_node"], json!({"nested": [1, 2]}));
    assert_eq!(out["recursion"], json!(null));
}

#[test]
fn json_null_inside_some_is_written_as_null() {
    let value = TestObject {
        json_node: Some(serde_json::Value::Null),
        ..TestObject::default()
    };
    let out = write(&View::of(&value));
    assert_eq!(out["json_node"], json!(null));
}

#[test]
fn top_level_values_need_not_be_objects() {
    let id = uuid::Uuid::nil();
    assert_eq!(
        write(&View::of(&vec![id])),
        json!(["00000000-0000-0000-0000-000000000000"])
    );
    assert_eq!(write(&View::of(&Bytes::from(vec![1_u8, 2]))), json!([1, 2]));
    assert_eq!(write(&View::of(&'x')), json!("x"));
    assert_eq!(write(&View::of(&None::<u8>)), json!(null));
}

#[test]
fn nulls_are_written_by_default() {
    let value = TestNulls::default();
    assert_eq!(write(&View::of(&value)), json!({"a": null, "b": null}));
}

#[test]
fn engine_can_omit_nulls() {
    let engine = ViewEngine::with_config(ViewConfig::default().with_inclusion(Inclusion::NonNull));
    let value = TestNulls {
        a: None,
        b: Some(2),
    };
    assert_eq!(engine.to_string(&View::of(&value)).unwrap(), r#"{"b":2}"#);

    let mut engine = ViewEngine::new();
    engine.set_default_inclusion(Inclusion::NonNull);
    assert_eq!(engine.to_string(&View::of(&TestNulls::default())).unwrap(), "{}");
}

#[test]
fn type_and_property_tags_override_the_engine() {
    let value = TestNonNulls::default();
    assert_eq!(write(&View::of(&value)), json!({"kept": null}));

    let value = TestObject::default();
    let out = write(&View::of(&value));
    assert!(out.get("str2").is_none());
    assert_eq!(out["str1"], json!(null));
}

#[test]
fn engine_serializer_applies_to_every_position() {
    let mut engine = ViewEngine::new();
    engine
        .register_serializer(|c: &CustomType| format!("{}:{}", c.sid, c.name))
        .unwrap();

    let value = sample();
    let out = engine.to_value(&View::of(&value)).unwrap();
    assert_eq!(out["custom"], "5:custom");

    let values = vec![value.custom.clone(), None];
    let out = engine.to_value(&View::of(&values)).unwrap();
    assert_eq!(out, json!(["5:custom", null]));
}

#[test]
fn property_serializer_beats_the_engine() {
    let mut engine = ViewEngine::new();
    engine
        .register_serializer(|s: &String| format!("<{s}>"))
        .unwrap();

    let value = Labeled {
        label: "label".into(),
        secret: Some("abc".into()),
        ..Labeled::default()
    };
    let out = engine.to_value(&View::of(&value)).unwrap();
    assert_eq!(out["title"], "<label>");
    assert_eq!(out["secret"], "***");
}

#[test]
fn serializer_registration() {
    let mut engine = ViewEngine::new();
    engine.register_serializer(|n: &u32| n + 1).unwrap();

    let err = engine.register_serializer(|n: &u32| n + 2).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateSerializer(_)));
    assert_eq!(engine.to_string(&View::of(&1_u32)).unwrap(), "2");

    assert!(engine.unregister_serializer::<u32>());
    assert!(!engine.unregister_serializer::<u32>());
    assert_eq!(engine.to_string(&View::of(&1_u32)).unwrap(), "1");
}

#[test]
fn depth_limit_fails_the_write() {
    let engine = ViewEngine::with_config(ViewConfig::default().with_max_depth(2));

    let out = engine.to_value(&View::of(&Node::chain(2))).unwrap();
    assert_eq!(out, json!({"value": 0, "next": {"value": 1, "next": null}}));

    let err = engine.to_string(&View::of(&Node::chain(3))).unwrap_err();
    assert!(err.to_string().contains("`next.next`"), "{err}");
}

#[test]
fn output_sinks_agree() {
    let engine = ViewEngine::new();
    let value = sample();
    let view = View::of(&value)
        .on_type::<TestObject>(Match::new().exclude(["*"]).include(["int1", "str1"]))
        .unwrap();

    let text = engine.to_string(&view).unwrap();
    assert_eq!(text, r#"{"int1":1,"str1":"str1"}"#);
    assert_eq!(engine.to_vec(&view).unwrap(), text.as_bytes());

    let mut buf = Vec::new();
    engine.to_writer(&mut buf, &view).unwrap();
    assert_eq!(buf, text.as_bytes());

    let pretty = engine.to_string_pretty(&view).unwrap();
    assert!(pretty.contains("\n  \"int1\": 1"));
}

#[test]
fn writing_twice_gives_the_same_output() {
    let engine = ViewEngine::new();
    let value = sample();
    let view = engine
        .view(&value)
        .on_type::<TestObject>(Match::new().exclude(["sub.val", "list"]))
        .unwrap();

    let first = engine.to_string(&view).unwrap();
    assert_eq!(engine.to_string(&view).unwrap(), first);
}

#[test]
fn concurrent_writes_share_the_engine() {
    let engine = ViewEngine::new().with_cache(Arc::new(MetadataCache::with_capacity(4)));
    let value = sample();
    let expected = engine.to_string(&engine.view(&value)).unwrap();

    std::thread::scope(|s| {
        for i in 0..4 {
            let (engine, value, expected) = (&engine, &value, &expected);
            s.spawn(move || {
                for _ in 0..25 {
                    let view = engine.view(value);
                    assert_eq!(&engine.to_string(&view).unwrap(), expected);

                    let view = engine
                        .view(value)
                        .on_type::<TestObject>(Match::new().exclude(["*"]).include(["int1"]))
                        .unwrap();
                    assert_eq!(engine.to_string(&view).unwrap(), r#"{"int1":1}"#, "thread {i}");
                }
            });
        }
    });
}

#[test]
fn config_loaded_from_json() {
    let config: ViewConfig =
        serde_json::from_str(r#"{"inclusion": "non_null", "max_depth": 8}"#).unwrap();
    let engine = ViewEngine::with_config(config);

    assert_eq!(engine.config().max_depth, 8);
    assert_eq!(engine.to_string(&View::of(&TestNulls::default())).unwrap(), "{}");
}
