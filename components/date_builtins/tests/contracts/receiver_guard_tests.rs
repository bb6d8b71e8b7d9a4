//! Contract tests for the Date receiver guard and method registration

use std::cell::Cell;
use std::rc::Rc;

use date_builtins::{DatePrototype, ErrorKind, JsDate, JsValue, DATE_PROTOTYPE_METHODS};

use super::{config, date_at, n, BASE};

#[test]
fn test_every_method_rejects_non_dates() {
    let receivers = [
        JsValue::object(),
        JsValue::number(BASE),
        JsValue::string("2024-11-05"),
        JsValue::boolean(true),
        JsValue::undefined(),
        JsValue::null(),
    ];
    for method in DATE_PROTOTYPE_METHODS {
        for receiver in &receivers {
            let err = (method.func)(receiver, &[n(1.0)]).unwrap_err();
            assert_eq!(err.kind, ErrorKind::TypeError, "{}", method.name);
        }
    }
}

#[test]
fn test_rejection_does_not_touch_receiver_or_arguments() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let argument = JsValue::object();
    argument.set(
        "valueOf",
        JsValue::function("valueOf", 0, move |_, _| {
            counter.set(counter.get() + 1);
            Ok(JsValue::number(1.0))
        }),
    );

    let receiver = JsValue::object_with_proto(&DatePrototype::create());
    receiver.set("marker", n(1.0));
    let err = receiver.invoke("setHours", &[argument]).unwrap_err();

    assert!(err.is(ErrorKind::TypeError));
    assert_eq!(calls.get(), 0);
    assert_eq!(receiver.get_own("marker"), Some(n(1.0)));
}

#[test]
fn test_value_of_is_get_time() {
    let prototype = DatePrototype::create();
    let value_of = prototype.get("valueOf").unwrap();
    let get_time = prototype.get("getTime").unwrap();
    assert!(value_of.same_function(&get_time));
    assert_eq!(value_of.function_length(), Some(0));
}

#[test]
fn test_declared_lengths() {
    let prototype = DatePrototype::create();
    let length = |name: &str| prototype.get(name).and_then(|f| f.function_length());
    assert_eq!(length("setFullYear"), Some(3));
    assert_eq!(length("setHours"), Some(4));
    assert_eq!(length("setMilliseconds"), Some(1));
    assert_eq!(length("setMinutes"), Some(3));
    assert_eq!(length("setSeconds"), Some(2));
    assert_eq!(length("getUTCSeconds"), Some(0));
    assert_eq!(length("toString"), Some(0));
}

#[test]
fn test_methods_work_without_prototype_link() {
    let date = JsValue::date(JsDate::from_timestamp(BASE, &config()));
    assert_eq!(
        DatePrototype::call("getUTCHours", &date, &[]).unwrap(),
        n(13.0)
    );
    assert_eq!(DatePrototype::call("valueOf", &date, &[]).unwrap(), n(BASE));
}

#[test]
fn test_borrowed_method_on_other_date() {
    let lender = date_at(0.0);
    let get_time = lender.get("getTime").unwrap();
    let other = date_at(BASE);
    assert_eq!(get_time.call(&other, &[]).unwrap(), n(BASE));
}
