//! Contract tests for Date.prototype.toJSON

use std::cell::Cell;
use std::rc::Rc;

use date_builtins::{DatePrototype, ErrorKind, JsValue};

use super::{call, date_at, invalid_date, BASE};

fn to_json(this: &JsValue) -> Result<JsValue, date_builtins::JsError> {
    DatePrototype::to_json(this, &[JsValue::string("key")])
}

#[test]
fn test_to_json_has_length_one() {
    let prototype = DatePrototype::create();
    let to_json = prototype.get_own("toJSON").unwrap();
    assert_eq!(to_json.function_length(), Some(1));
    assert!(!to_json.same_function(&prototype.get_own("toISOString").unwrap()));
}

#[test]
fn test_valid_date_serializes_as_iso() {
    assert_eq!(
        call(&date_at(BASE), "toJSON", &[]),
        JsValue::string("2024-11-05T13:30:00.007Z")
    );
}

#[test]
fn test_invalid_date_serializes_as_null() {
    assert_eq!(call(&invalid_date(), "toJSON", &[]), JsValue::null());
}

#[test]
fn test_generic_on_plain_object() {
    let obj = JsValue::object();
    obj.set(
        "valueOf",
        JsValue::function("valueOf", 0, |_, _| Ok(JsValue::number(1.0))),
    );
    obj.set(
        "toISOString",
        JsValue::function("toISOString", 0, |this, _| {
            Ok(this.get("label").unwrap_or_default())
        }),
    );
    obj.set("label", JsValue::string("custom"));

    assert_eq!(to_json(&obj).unwrap(), JsValue::string("custom"));
}

#[test]
fn test_plain_object_with_non_finite_primitive() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let obj = JsValue::object();
    obj.set(
        "valueOf",
        JsValue::function("valueOf", 0, |_, _| Ok(JsValue::number(f64::INFINITY))),
    );
    obj.set(
        "toISOString",
        JsValue::function("toISOString", 0, move |_, _| {
            counter.set(counter.get() + 1);
            Ok(JsValue::string("unused"))
        }),
    );

    assert_eq!(to_json(&obj).unwrap(), JsValue::null());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_string_primitive_still_calls_to_iso_string() {
    let obj = JsValue::object();
    obj.set(
        "toString",
        JsValue::function("toString", 0, |_, _| Ok(JsValue::string("NaN"))),
    );
    obj.set(
        "toISOString",
        JsValue::function("toISOString", 0, |_, _| Ok(JsValue::string("called"))),
    );
    assert_eq!(to_json(&obj).unwrap(), JsValue::string("called"));
}

#[test]
fn test_missing_to_iso_string_is_type_error() {
    let obj = JsValue::object();
    obj.set(
        "valueOf",
        JsValue::function("valueOf", 0, |_, _| Ok(JsValue::number(0.0))),
    );
    assert!(to_json(&obj).unwrap_err().is(ErrorKind::TypeError));
}

#[test]
fn test_nullish_receiver_is_type_error() {
    assert!(to_json(&JsValue::undefined()).unwrap_err().is(ErrorKind::TypeError));
    assert!(to_json(&JsValue::null()).unwrap_err().is(ErrorKind::TypeError));
}

#[test]
fn test_per_object_override() {
    let prototype = DatePrototype::create();
    let config = super::config();
    let first = DatePrototype::instantiate(
        &prototype,
        date_builtins::JsDate::from_timestamp(BASE, &config),
    );
    let second = DatePrototype::instantiate(
        &prototype,
        date_builtins::JsDate::from_timestamp(BASE, &config),
    );

    first.set(
        "toJSON",
        JsValue::function("toJSON", 1, |_, _| Ok(JsValue::string("overridden"))),
    );
    assert_eq!(call(&first, "toJSON", &[]), JsValue::string("overridden"));
    assert_eq!(
        call(&second, "toJSON", &[]),
        JsValue::string("2024-11-05T13:30:00.007Z")
    );
}

#[test]
fn test_uses_overridden_to_iso_string() {
    let date = date_at(BASE);
    date.set(
        "toISOString",
        JsValue::function("toISOString", 0, |_, _| Ok(JsValue::string("mine"))),
    );
    assert_eq!(call(&date, "toJSON", &[]), JsValue::string("mine"));
}
