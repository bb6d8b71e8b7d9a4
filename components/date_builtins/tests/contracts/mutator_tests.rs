//! Contract tests for the Date.prototype mutators

use std::cell::RefCell;
use std::rc::Rc;

use date_builtins::{ErrorKind, JsDate, JsError, JsValue};

use super::{call, config, date_at, invalid_date, n, num, BASE};

fn throwing(message: &'static str) -> JsValue {
    let obj = JsValue::object();
    obj.set(
        "valueOf",
        JsValue::function("valueOf", 0, move |_, _| {
            Err(JsError::new(ErrorKind::Error, message))
        }),
    );
    obj
}

fn recording(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str, value: f64) -> JsValue {
    let log = log.clone();
    let obj = JsValue::object();
    obj.set(
        "valueOf",
        JsValue::function("valueOf", 0, move |_, _| {
            log.borrow_mut().push(tag);
            Ok(JsValue::number(value))
        }),
    );
    obj
}

#[test]
fn test_set_milliseconds_carries_into_seconds() {
    let date = date_at(BASE);
    let t = call(&date, "setMilliseconds", &[n(1500.0)]);
    assert_eq!(t, n(1_730_813_401_500.0));
    assert_eq!(num(&date, "getSeconds"), 1.0);
    assert_eq!(num(&date, "getMilliseconds"), 500.0);
}

#[test]
fn test_set_milliseconds_negative_borrows() {
    let date = date_at(BASE);
    let t = call(&date, "setMilliseconds", &[n(-1.0)]);
    assert_eq!(t, n(1_730_813_399_999.0));
    assert_eq!(num(&date, "getMinutes"), 29.0);
    assert_eq!(num(&date, "getSeconds"), 59.0);
    assert_eq!(num(&date, "getMilliseconds"), 999.0);
}

#[test]
fn test_set_milliseconds_without_carry() {
    let date = date_at(BASE);
    assert_eq!(call(&date, "setMilliseconds", &[n(250.0)]), n(BASE - 7.0 + 250.0));
    assert_eq!(num(&date, "getSeconds"), 0.0);
}

#[test]
fn test_set_seconds_carries_into_minutes() {
    let date = date_at(BASE);
    let t = call(&date, "setSeconds", &[n(65.0)]);
    assert_eq!(t, n(1_730_813_465_007.0));
    assert_eq!(num(&date, "getMinutes"), 31.0);
    assert_eq!(num(&date, "getSeconds"), 5.0);
    assert_eq!(num(&date, "getMilliseconds"), 7.0);
}

#[test]
fn test_set_seconds_with_milliseconds() {
    let date = date_at(BASE);
    call(&date, "setSeconds", &[n(10.0), n(2500.0)]);
    assert_eq!(num(&date, "getSeconds"), 12.0);
    assert_eq!(num(&date, "getMilliseconds"), 500.0);
}

#[test]
fn test_set_hours_preserves_other_fields() {
    let date = date_at(BASE);
    let t = call(&date, "setHours", &[n(3.0)]);
    assert_eq!(t, n(1_730_773_800_007.0));
    assert_eq!(num(&date, "getHours"), 3.0);
    assert_eq!(num(&date, "getMinutes"), 30.0);
    assert_eq!(num(&date, "getSeconds"), 0.0);
    assert_eq!(num(&date, "getMilliseconds"), 7.0);
    assert_eq!(num(&date, "getDate"), 5.0);
}

#[test]
fn test_set_hours_rolls_into_next_day() {
    let date = date_at(BASE);
    let t = call(&date, "setHours", &[n(25.0), n(0.0), n(0.0), n(0.0)]);
    assert_eq!(t, n(1_730_851_200_000.0));
    assert_eq!(num(&date, "getDate"), 6.0);
    assert_eq!(num(&date, "getHours"), 1.0);
}

#[test]
fn test_set_minutes_all_arguments() {
    let date = date_at(BASE);
    call(&date, "setMinutes", &[n(-1.0), n(30.0), n(1.0)]);
    assert_eq!(num(&date, "getHours"), 13.0);
    assert_eq!(num(&date, "getMinutes"), 59.0);
    assert_eq!(num(&date, "getSeconds"), 30.0);
    assert_eq!(num(&date, "getMilliseconds"), 1.0);
}

#[test]
fn test_set_full_year_matches_direct_construction() {
    let date = date_at(BASE);
    let t = call(&date, "setFullYear", &[n(2000.0), n(1.0), n(29.0)]);
    let direct = JsDate::from_local_components(&config(), 2000, 1, 29, 14, 30, 0, 7);
    assert_eq!(t, n(direct.time()));
    assert_eq!(t, n(951_831_000_007.0));
}

#[test]
fn test_set_full_year_leap_day_rolls_over() {
    let date = date_at(951_831_000_007.0);
    let t = call(&date, "setFullYear", &[n(2021.0)]);
    assert_eq!(t, n(1_614_605_400_007.0));
    assert_eq!(num(&date, "getMonth"), 2.0);
    assert_eq!(num(&date, "getDate"), 1.0);
}

#[test]
fn test_set_full_year_month_rollover() {
    let date = date_at(BASE);
    call(&date, "setFullYear", &[n(2024.0), n(12.0)]);
    assert_eq!(num(&date, "getFullYear"), 2025.0);
    assert_eq!(num(&date, "getMonth"), 0.0);
    assert_eq!(num(&date, "getDate"), 5.0);
}

#[test]
fn test_set_full_year_on_invalid_date_starts_at_epoch() {
    let date = invalid_date();
    let t = call(&date, "setFullYear", &[n(2000.0)]);
    // 1970-01-01T01:00 local carried to 2000
    assert_eq!(t, n(946_684_800_000.0));
    assert_eq!(num(&date, "getMilliseconds"), 0.0);
}

#[test]
fn test_other_mutators_on_invalid_date_convert_then_return_nan() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let date = invalid_date();
    let t = call(&date, "setMinutes", &[recording(&log, "minutes", 1.0)]);
    assert!(t.as_number().unwrap().is_nan());
    assert_eq!(*log.borrow(), vec!["minutes"]);
    assert!(num(&date, "getTime").is_nan());
}

#[test]
fn test_failed_conversion_leaves_date_unchanged() {
    let date = date_at(BASE);
    let before = call(&date, "toString", &[]);

    let err = date
        .invoke("setMinutes", &[n(10.0), throwing("boom")])
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Error);
    assert_eq!(err.message, "boom");

    assert_eq!(num(&date, "getTime"), BASE);
    assert_eq!(num(&date, "getMinutes"), 30.0);
    assert_eq!(num(&date, "getMilliseconds"), 7.0);
    assert_eq!(call(&date, "toString", &[]), before);
}

#[test]
fn test_arguments_converted_left_to_right_and_stop_at_failure() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let date = date_at(BASE);
    let result = date.invoke(
        "setHours",
        &[
            recording(&log, "hours", 1.0),
            throwing("minutes"),
            recording(&log, "seconds", 2.0),
        ],
    );
    assert!(result.is_err());
    assert_eq!(*log.borrow(), vec!["hours"]);
    assert_eq!(num(&date, "getTime"), BASE);
}

#[test]
fn test_defaults_come_from_snapshot_before_coercion() {
    let date = date_at(BASE);
    let target = date.clone();
    let sneaky = JsValue::object();
    sneaky.set(
        "valueOf",
        JsValue::function("valueOf", 0, move |_, _| {
            target.invoke("setMinutes", &[JsValue::number(0.0)])?;
            Ok(JsValue::number(5.0))
        }),
    );

    call(&date, "setHours", &[sneaky]);
    assert_eq!(num(&date, "getHours"), 5.0);
    assert_eq!(num(&date, "getMinutes"), 30.0);
}

#[test]
fn test_unparameterized_fields_read_after_coercion() {
    let date = date_at(BASE);
    let target = date.clone();
    let sneaky = JsValue::object();
    sneaky.set(
        "valueOf",
        JsValue::function("valueOf", 0, move |_, _| {
            target.invoke("setFullYear", &[JsValue::number(2030.0)])?;
            Ok(JsValue::number(42.0))
        }),
    );

    call(&date, "setSeconds", &[sneaky]);
    assert_eq!(num(&date, "getFullYear"), 2030.0);
    assert_eq!(num(&date, "getSeconds"), 42.0);
}

#[test]
fn test_return_value_is_new_time() {
    let date = date_at(BASE);
    for (name, args) in [
        ("setFullYear", vec![n(1999.0)]),
        ("setHours", vec![n(7.0)]),
        ("setMinutes", vec![n(7.0)]),
        ("setSeconds", vec![n(7.0)]),
        ("setMilliseconds", vec![n(7.0)]),
    ] {
        let t = call(&date, name, &args);
        assert_eq!(t, n(num(&date, "getTime")), "{}", name);
    }
}

#[test]
fn test_non_numeric_arguments_use_to_int32() {
    let date = date_at(BASE);
    call(&date, "setMinutes", &[JsValue::string("15"), JsValue::boolean(true)]);
    assert_eq!(num(&date, "getMinutes"), 15.0);
    assert_eq!(num(&date, "getSeconds"), 1.0);

    call(&date, "setSeconds", &[n(f64::NAN)]);
    assert_eq!(num(&date, "getSeconds"), 0.0);
}

#[test]
fn test_out_of_range_rewrite_invalidates() {
    let date = date_at(BASE);
    let t = call(&date, "setFullYear", &[n(300_000.0)]);
    assert!(t.as_number().unwrap().is_nan());
    assert!(num(&date, "getFullYear").is_nan());
}
