//! End-to-end tests: object graphs written through views.

mod filtering;
mod output;

use alloc::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::{View, ViewEngine};
use models::{Color, CustomType, TestObject, TestSubobject};

/// Writes `view` with a default engine.
fn write(view: &View<'_>) -> Value {
    ViewEngine::new().to_value(view).unwrap()
}

/// A populated object used by most tests.
fn sample() -> TestObject {
    TestObject {
        int1: 1,
        str1: Some("str1".into()),
        str2: Some("str2".into()),
        ignored_direct: Some("direct".into()),
        ignored_indirect: Some("indirect".into()),
        string_array: vec!["a".into(), "b".into()].into_boxed_slice(),
        list: vec!["x".into(), "y".into()],
        sub: Some(TestSubobject {
            other_val: Some("other".into()),
            ..TestSubobject::with_sub("sub", TestSubobject::new("subsub"))
        }),
        sub_with_ignores: Some(TestSubobject {
            other_val: Some("kept".into()),
            ..TestSubobject::new("dropped")
        }),
        list_of_objects: vec![TestSubobject::new("first"), TestSubobject::new("second")],
        map_of_objects: BTreeMap::from([
            ("first".into(), TestSubobject::new("one")),
            ("second".into(), TestSubobject::new("two")),
        ]),
        map_with_int_keys: BTreeMap::from([(1, "one".into()), (2, "two".into())]),
        color: Some(Color::Green),
        date: NaiveDate::from_ymd_opt(2024, 1, 2),
        recursion: None,
        widget_name: Some("widget".into()),
        json_node: None,
        custom: Some(CustomType {
            sid: 5,
            name: "custom".into(),
        }),
    }
}
