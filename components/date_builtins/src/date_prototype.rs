//! Date.prototype methods
//!
//! Every method is a native function `(this, args) -> JsResult<JsValue>`.
//! Methods bound to Date values start with the receiver guard; `toJSON` is
//! generic and only relies on property lookup.
//!
//! Mutators follow one order: snapshot the local breakdown, convert the
//! supplied arguments left to right, write the millisecond field, then issue
//! a single rewrite of the six civil fields. Defaults come from the snapshot,
//! fields a mutator has no parameter for are read again just before the
//! rewrite, since argument coercion may run user code.

use num_integer::Integer;

use crate::civil::CivilFields;
use crate::date::JsDate;
use crate::value::{JsError, JsResult, JsValue, NativeFn};

/// One native method slot on the prototype
#[derive(Clone, Copy)]
pub struct NativeMethod {
    /// Property name
    pub name: &'static str,
    /// Declared `length`
    pub length: u32,
    /// Implementation
    pub func: NativeFn,
}

impl NativeMethod {
    /// Wrap the method as a callable function value
    pub fn to_function(&self) -> JsValue {
        let func = self.func;
        JsValue::function(self.name, self.length, move |this, args| func(this, args))
    }
}

const fn native(name: &'static str, length: u32, func: NativeFn) -> NativeMethod {
    NativeMethod { name, length, func }
}

/// Methods installed on Date.prototype, in installation order
pub const DATE_PROTOTYPE_METHODS: &[NativeMethod] = &[
    native("getDate", 0, DatePrototype::get_date),
    native("getDay", 0, DatePrototype::get_day),
    native("getFullYear", 0, DatePrototype::get_full_year),
    native("setFullYear", 3, DatePrototype::set_full_year),
    native("getHours", 0, DatePrototype::get_hours),
    native("setHours", 4, DatePrototype::set_hours),
    native("getMilliseconds", 0, DatePrototype::get_milliseconds),
    native("setMilliseconds", 1, DatePrototype::set_milliseconds),
    native("getMinutes", 0, DatePrototype::get_minutes),
    native("setMinutes", 3, DatePrototype::set_minutes),
    native("getMonth", 0, DatePrototype::get_month),
    native("getSeconds", 0, DatePrototype::get_seconds),
    native("setSeconds", 2, DatePrototype::set_seconds),
    native("getTime", 0, DatePrototype::get_time),
    native("getUTCDate", 0, DatePrototype::get_utc_date),
    native("getUTCDay", 0, DatePrototype::get_utc_day),
    native("getUTCFullYear", 0, DatePrototype::get_utc_full_year),
    native("getUTCHours", 0, DatePrototype::get_utc_hours),
    native("getUTCMilliseconds", 0, DatePrototype::get_utc_milliseconds),
    native("getUTCMinutes", 0, DatePrototype::get_utc_minutes),
    native("getUTCMonth", 0, DatePrototype::get_utc_month),
    native("getUTCSeconds", 0, DatePrototype::get_utc_seconds),
    native("toDateString", 0, DatePrototype::to_date_string),
    native("toGMTString", 0, DatePrototype::to_gmt_string),
    native("toISOString", 0, DatePrototype::to_iso_string),
    native("toLocaleDateString", 0, DatePrototype::to_locale_date_string),
    native("toLocaleString", 0, DatePrototype::to_locale_string),
    native("toLocaleTimeString", 0, DatePrototype::to_locale_time_string),
    native("toTimeString", 0, DatePrototype::to_time_string),
    native("toString", 0, DatePrototype::to_string),
];

/// Names installed as the very same function value as another slot
pub const DATE_PROTOTYPE_ALIASES: &[(&str, &str)] = &[("valueOf", "getTime")];

/// Generic `toJSON` slot
pub static TO_JSON: NativeMethod = native("toJSON", 1, DatePrototype::to_json);

/// Date.prototype methods
pub struct DatePrototype;

impl DatePrototype {
    /// Build a prototype object carrying every Date method
    pub fn create() -> JsValue {
        let prototype = JsValue::object();
        for method in DATE_PROTOTYPE_METHODS {
            prototype.set(method.name, method.to_function());
        }
        for (alias, target) in DATE_PROTOTYPE_ALIASES {
            if let Some(function) = prototype.get_own(target) {
                prototype.set(alias, function);
            }
        }
        prototype.set(TO_JSON.name, TO_JSON.to_function());
        prototype
    }

    /// Wrap a Date as a value whose methods resolve through `prototype`
    pub fn instantiate(prototype: &JsValue, date: JsDate) -> JsValue {
        let value = JsValue::date(date);
        value.set_prototype(prototype);
        value
    }

    /// Resolve a method name, aliases included
    pub fn method(name: &str) -> Option<&'static NativeMethod> {
        let target = DATE_PROTOTYPE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, target)| *target);
        if target == TO_JSON.name {
            return Some(&TO_JSON);
        }
        DATE_PROTOTYPE_METHODS.iter().find(|m| m.name == target)
    }

    /// Call a method by name without going through a prototype object
    pub fn call(name: &str, this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        let method = Self::method(name).ok_or_else(|| {
            JsError::type_error(format!("Date.prototype.{} is not a function", name))
        })?;
        (method.func)(this, args)
    }

    /// Receiver guard: the Date behind `this`, or a TypeError
    pub fn typed_this(this: &JsValue) -> JsResult<JsDate> {
        match this.to_object()? {
            JsValue::Date(date) => Ok(date),
            other => {
                tracing::debug!(receiver = other.type_of(), "receiver is not a Date");
                Err(JsError::type_error("Not an object of type Date"))
            }
        }
    }

    fn local_field(this: &JsValue, field: fn(&CivilFields) -> f64) -> JsResult<JsValue> {
        let date = Self::typed_this(this)?;
        Ok(JsValue::number(date.local().map_or(f64::NAN, |f| field(&f))))
    }

    fn utc_field(this: &JsValue, field: fn(&CivilFields) -> f64) -> JsResult<JsValue> {
        let date = Self::typed_this(this)?;
        Ok(JsValue::number(date.utc().map_or(f64::NAN, |f| field(&f))))
    }

    fn milliseconds_field(this: &JsValue) -> JsResult<JsValue> {
        let date = Self::typed_this(this)?;
        Ok(JsValue::number(
            date.milliseconds().map_or(f64::NAN, f64::from),
        ))
    }

    /// Date.prototype.getDate()
    pub fn get_date(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::local_field(this, |f| f64::from(f.day))
    }

    /// Date.prototype.getDay()
    pub fn get_day(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::local_field(this, |f| f64::from(f.weekday))
    }

    /// Date.prototype.getFullYear()
    pub fn get_full_year(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::local_field(this, |f| f64::from(f.year))
    }

    /// Date.prototype.getHours()
    pub fn get_hours(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::local_field(this, |f| f64::from(f.hour))
    }

    /// Date.prototype.getMilliseconds()
    pub fn get_milliseconds(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::milliseconds_field(this)
    }

    /// Date.prototype.getMinutes()
    pub fn get_minutes(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::local_field(this, |f| f64::from(f.minute))
    }

    /// Date.prototype.getMonth()
    pub fn get_month(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::local_field(this, |f| f64::from(f.month))
    }

    /// Date.prototype.getSeconds()
    pub fn get_seconds(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::local_field(this, |f| f64::from(f.second))
    }

    /// Date.prototype.getTime(), also installed as valueOf
    pub fn get_time(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::number(Self::typed_this(this)?.time()))
    }

    /// Date.prototype.getUTCDate()
    pub fn get_utc_date(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::utc_field(this, |f| f64::from(f.day))
    }

    /// Date.prototype.getUTCDay()
    pub fn get_utc_day(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::utc_field(this, |f| f64::from(f.weekday))
    }

    /// Date.prototype.getUTCFullYear()
    pub fn get_utc_full_year(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::utc_field(this, |f| f64::from(f.year))
    }

    /// Date.prototype.getUTCHours()
    pub fn get_utc_hours(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::utc_field(this, |f| f64::from(f.hour))
    }

    /// Date.prototype.getUTCMilliseconds()
    ///
    /// Offsets are whole seconds, so this is the local millisecond field.
    pub fn get_utc_milliseconds(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::milliseconds_field(this)
    }

    /// Date.prototype.getUTCMinutes()
    pub fn get_utc_minutes(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::utc_field(this, |f| f64::from(f.minute))
    }

    /// Date.prototype.getUTCMonth()
    pub fn get_utc_month(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::utc_field(this, |f| f64::from(f.month))
    }

    /// Date.prototype.getUTCSeconds()
    pub fn get_utc_seconds(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Self::utc_field(this, |f| f64::from(f.second))
    }

    /// Date.prototype.setFullYear(year[, month[, date]])
    ///
    /// An invalid date is treated as time value +0 with a zero millisecond
    /// field.
    pub fn set_full_year(this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        let date = Self::typed_this(this)?;
        let snapshot = date.local_or_epoch();

        let year = required_int(args, 0)?;
        let month = optional_int(args, 1)?.unwrap_or(snapshot.month as i32);
        let day = optional_int(args, 2)?.unwrap_or(snapshot.day as i32);

        let milliseconds = date.milliseconds().map_or(0, i32::from);
        let current = date.local_or_epoch();
        Ok(commit(&date, Some(current), milliseconds, |now| {
            [
                year.into(),
                month.into(),
                day.into(),
                now.hour.into(),
                now.minute.into(),
                now.second.into(),
            ]
        }))
    }

    /// Date.prototype.setHours(hour[, min[, sec[, ms]]])
    pub fn set_hours(this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        let date = Self::typed_this(this)?;
        let snapshot = date.local();
        let snapshot_ms = date.milliseconds();

        let hour = required_int(args, 0)?;
        let minute = optional_int(args, 1)?;
        let second = optional_int(args, 2)?;
        let milliseconds = optional_int(args, 3)?;

        let (Some(snapshot), Some(snapshot_ms)) = (snapshot, snapshot_ms) else {
            return Ok(JsValue::number(f64::NAN));
        };
        let minute = minute.unwrap_or(snapshot.minute as i32);
        let second = second.unwrap_or(snapshot.second as i32);
        let milliseconds = milliseconds.unwrap_or(i32::from(snapshot_ms));

        Ok(commit(&date, date.local(), milliseconds, |now| {
            [
                now.year.into(),
                now.month.into(),
                now.day.into(),
                hour.into(),
                minute.into(),
                second.into(),
            ]
        }))
    }

    /// Date.prototype.setMilliseconds(ms)
    ///
    /// Writes the millisecond field and only rewrites the civil fields when
    /// the argument carries into the seconds.
    pub fn set_milliseconds(this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        let date = Self::typed_this(this)?;
        let milliseconds = required_int(args, 0)?;

        if !date.is_valid() {
            return Ok(JsValue::number(f64::NAN));
        }
        let (added_seconds, milliseconds) = split_milliseconds(milliseconds);
        date.set_milliseconds(milliseconds);

        if added_seconds != 0 {
            if let Some(now) = date.local() {
                date.rewrite(
                    now.year.into(),
                    now.month.into(),
                    now.day.into(),
                    now.hour.into(),
                    now.minute.into(),
                    i64::from(now.second) + added_seconds,
                );
            }
        }
        Ok(JsValue::number(date.time()))
    }

    /// Date.prototype.setMinutes(min[, sec[, ms]])
    pub fn set_minutes(this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        let date = Self::typed_this(this)?;
        let snapshot = date.local();
        let snapshot_ms = date.milliseconds();

        let minute = required_int(args, 0)?;
        let second = optional_int(args, 1)?;
        let milliseconds = optional_int(args, 2)?;

        let (Some(snapshot), Some(snapshot_ms)) = (snapshot, snapshot_ms) else {
            return Ok(JsValue::number(f64::NAN));
        };
        let second = second.unwrap_or(snapshot.second as i32);
        let milliseconds = milliseconds.unwrap_or(i32::from(snapshot_ms));

        Ok(commit(&date, date.local(), milliseconds, |now| {
            [
                now.year.into(),
                now.month.into(),
                now.day.into(),
                now.hour.into(),
                minute.into(),
                second.into(),
            ]
        }))
    }

    /// Date.prototype.setSeconds(sec[, ms])
    pub fn set_seconds(this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        let date = Self::typed_this(this)?;
        let snapshot_ms = date.milliseconds();

        let second = required_int(args, 0)?;
        let milliseconds = optional_int(args, 1)?;

        let Some(snapshot_ms) = snapshot_ms else {
            return Ok(JsValue::number(f64::NAN));
        };
        let milliseconds = milliseconds.unwrap_or(i32::from(snapshot_ms));

        Ok(commit(&date, date.local(), milliseconds, |now| {
            [
                now.year.into(),
                now.month.into(),
                now.day.into(),
                now.hour.into(),
                now.minute.into(),
                second.into(),
            ]
        }))
    }

    /// Date.prototype.toDateString()
    pub fn to_date_string(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::string(Self::typed_this(this)?.date_string()))
    }

    /// Date.prototype.toGMTString()
    pub fn to_gmt_string(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::string(Self::typed_this(this)?.gmt_string()))
    }

    /// Date.prototype.toISOString()
    pub fn to_iso_string(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::string(Self::typed_this(this)?.iso_string()?))
    }

    // Locale and options arguments are accepted but not yet honored.

    /// Date.prototype.toLocaleDateString([locales[, options]])
    pub fn to_locale_date_string(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::string(Self::typed_this(this)?.locale_date_string()))
    }

    /// Date.prototype.toLocaleString([locales[, options]])
    pub fn to_locale_string(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::string(Self::typed_this(this)?.locale_string()))
    }

    /// Date.prototype.toLocaleTimeString([locales[, options]])
    pub fn to_locale_time_string(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::string(Self::typed_this(this)?.locale_time_string()))
    }

    /// Date.prototype.toTimeString()
    pub fn to_time_string(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::string(Self::typed_this(this)?.time_string()))
    }

    /// Date.prototype.toString()
    pub fn to_string(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        Ok(JsValue::string(Self::typed_this(this)?.string()))
    }

    /// Date.prototype.toJSON(key)
    ///
    /// Generic: works on any object with a callable `toISOString`.
    pub fn to_json(this: &JsValue, _args: &[JsValue]) -> JsResult<JsValue> {
        let object = this.to_object()?;
        if let JsValue::Number(time_value) = object.to_primitive_number()? {
            if !time_value.is_finite() {
                return Ok(JsValue::null());
            }
        }
        object.invoke("toISOString", &[])
    }
}

/// ToInt32 of argument `index`; a missing argument reads as undefined
fn required_int(args: &[JsValue], index: usize) -> JsResult<i32> {
    args.get(index).map_or(Ok(0), JsValue::to_int32)
}

/// ToInt32 of argument `index` if it was supplied
fn optional_int(args: &[JsValue], index: usize) -> JsResult<Option<i32>> {
    args.get(index).map(JsValue::to_int32).transpose()
}

/// Split milliseconds into whole seconds and a 0-999 remainder, flooring
fn split_milliseconds(milliseconds: i32) -> (i64, u16) {
    let (seconds, remainder) = i64::from(milliseconds).div_mod_floor(&1000);
    (seconds, remainder as u16)
}

/// Write the millisecond field, then rewrite the civil fields once
///
/// `current` is the breakdown that fields without a parameter are read
/// from; when it is missing the date is invalid and nothing is written.
fn commit(
    date: &JsDate,
    current: Option<CivilFields>,
    milliseconds: i32,
    fields: impl FnOnce(&CivilFields) -> [i64; 6],
) -> JsValue {
    let Some(current) = current else {
        return JsValue::number(f64::NAN);
    };
    let (added_seconds, milliseconds) = split_milliseconds(milliseconds);
    let [year, month, day, hour, minute, second] = fields(&current);
    date.set_milliseconds(milliseconds);
    JsValue::number(date.rewrite(year, month, day, hour, minute, second + added_seconds))
}
