//! JavaScript value representation for builtins
//!
//! A deliberately small object model: plain objects with a prototype link,
//! Date objects, and native functions. It provides the host operations the
//! Date methods depend on: receiver conversion, property lookup, method
//! invocation and the `ToPrimitive` / `ToNumber` / `ToInt32` coercions.
//! Coercion may call user-provided `valueOf` / `toString` functions and can
//! therefore fail or re-enter the runtime.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub use core_types::{ErrorKind, JsError, JsResult};

use crate::date::JsDate;

/// Signature of a native method: `(this, arguments) -> completion`
pub type NativeFn = fn(&JsValue, &[JsValue]) -> JsResult<JsValue>;

/// Internal object data
#[derive(Debug, Clone, Default)]
pub struct ObjectData {
    /// Object properties map
    pub properties: HashMap<String, JsValue>,
    /// Optional prototype reference
    pub prototype: Option<JsValue>,
}

/// Internal function data
pub struct FunctionData {
    name: String,
    length: u32,
    func: Box<dyn Fn(&JsValue, &[JsValue]) -> JsResult<JsValue>>,
}

impl fmt::Debug for FunctionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionData")
            .field("name", &self.name)
            .field("length", &self.length)
            .finish()
    }
}

/// JavaScript value representation
#[derive(Debug, Clone)]
pub enum JsValue {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String value
    String(String),
    /// Object with properties
    Object(Rc<RefCell<ObjectData>>),
    /// Date object
    Date(JsDate),
    /// Function object
    Function(Rc<FunctionData>),
}

impl JsValue {
    /// Create undefined value
    pub fn undefined() -> Self {
        JsValue::Undefined
    }

    /// Create null value
    pub fn null() -> Self {
        JsValue::Null
    }

    /// Create boolean value
    pub fn boolean(v: bool) -> Self {
        JsValue::Boolean(v)
    }

    /// Create number value
    pub fn number(v: f64) -> Self {
        JsValue::Number(v)
    }

    /// Create string value
    pub fn string(s: impl Into<String>) -> Self {
        JsValue::String(s.into())
    }

    /// Create empty object
    pub fn object() -> Self {
        JsValue::Object(Rc::new(RefCell::new(ObjectData::default())))
    }

    /// Create object with prototype
    pub fn object_with_proto(proto: &JsValue) -> Self {
        JsValue::Object(Rc::new(RefCell::new(ObjectData {
            properties: HashMap::new(),
            prototype: Some(proto.clone()),
        })))
    }

    /// Create a function value with a name and declared `length`
    pub fn function<F>(name: impl Into<String>, length: u32, func: F) -> Self
    where
        F: Fn(&JsValue, &[JsValue]) -> JsResult<JsValue> + 'static,
    {
        JsValue::Function(Rc::new(FunctionData {
            name: name.into(),
            length,
            func: Box::new(func),
        }))
    }

    /// Wrap a Date
    pub fn date(date: JsDate) -> Self {
        JsValue::Date(date)
    }

    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, JsValue::Null)
    }

    /// Check if value is number
    pub fn is_number(&self) -> bool {
        matches!(self, JsValue::Number(_))
    }

    /// Check if value is string
    pub fn is_string(&self) -> bool {
        matches!(self, JsValue::String(_))
    }

    /// Check if value is a Date
    pub fn is_date(&self) -> bool {
        matches!(self, JsValue::Date(_))
    }

    /// Check if value is a function
    pub fn is_function(&self) -> bool {
        matches!(self, JsValue::Function(_))
    }

    /// Whether the value is an object of any kind
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            JsValue::Object(_) | JsValue::Date(_) | JsValue::Function(_)
        )
    }

    /// Get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            JsValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_string(&self) -> Option<String> {
        match self {
            JsValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Get as Date handle
    pub fn as_date(&self) -> Option<JsDate> {
        match self {
            JsValue::Date(date) => Some(date.clone()),
            _ => None,
        }
    }

    /// Declared `length` of a function value
    pub fn function_length(&self) -> Option<u32> {
        match self {
            JsValue::Function(f) => Some(f.length),
            _ => None,
        }
    }

    /// Name of a function value
    pub fn function_name(&self) -> Option<String> {
        match self {
            JsValue::Function(f) => Some(f.name.clone()),
            _ => None,
        }
    }

    /// Whether both values are the same function object
    pub fn same_function(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Function(a), JsValue::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Set an own property; ignored on primitives and functions
    pub fn set(&self, key: &str, value: JsValue) {
        match self {
            JsValue::Object(obj) => {
                obj.borrow_mut().properties.insert(key.to_string(), value);
            }
            JsValue::Date(date) => date.set_property(key, value),
            _ => {}
        }
    }

    /// Set the prototype link of an object or Date
    pub fn set_prototype(&self, proto: &JsValue) {
        match self {
            JsValue::Object(obj) => obj.borrow_mut().prototype = Some(proto.clone()),
            JsValue::Date(date) => date.set_prototype(proto),
            _ => {}
        }
    }

    /// Get an own property, ignoring the prototype chain
    pub fn get_own(&self, key: &str) -> Option<JsValue> {
        match self {
            JsValue::Object(obj) => obj.borrow().properties.get(key).cloned(),
            JsValue::Date(date) => date.own_property(key),
            _ => None,
        }
    }

    /// Check if object has own property
    pub fn has_own(&self, key: &str) -> bool {
        self.get_own(key).is_some()
    }

    /// Get object prototype
    pub fn get_prototype(&self) -> Option<JsValue> {
        match self {
            JsValue::Object(obj) => obj.borrow().prototype.clone(),
            JsValue::Date(date) => date.prototype(),
            _ => None,
        }
    }

    /// Look a property up through the prototype chain
    pub fn get(&self, key: &str) -> Option<JsValue> {
        let mut current = Some(self.clone());
        while let Some(object) = current {
            if let Some(value) = object.get_own(key) {
                return Some(value);
            }
            current = object.get_prototype();
        }
        None
    }

    /// Call a function value with an explicit receiver
    pub fn call(&self, this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        match self {
            JsValue::Function(f) => (f.func)(this, args),
            other => Err(JsError::type_error(format!(
                "{} is not a function",
                other.type_of()
            ))),
        }
    }

    /// Invoke the method `name` found through property lookup on `self`
    pub fn invoke(&self, name: &str, args: &[JsValue]) -> JsResult<JsValue> {
        match self.get(name) {
            Some(method) if method.is_function() => method.call(self, args),
            _ => Err(JsError::type_error(format!("{} is not a function", name))),
        }
    }

    /// Get the type of the value (as JavaScript typeof would return)
    pub fn type_of(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null => "object",
            JsValue::Boolean(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
            JsValue::Object(_) | JsValue::Date(_) => "object",
            JsValue::Function(_) => "function",
        }
    }

    /// ToObject
    ///
    /// Primitive wrapper objects are not modelled: primitives are returned
    /// unchanged and simply fail any later object-kind test.
    pub fn to_object(&self) -> JsResult<JsValue> {
        match self {
            JsValue::Undefined | JsValue::Null => Err(JsError::type_error(format!(
                "Cannot convert {} to object",
                if self.is_null() { "null" } else { "undefined" }
            ))),
            other => Ok(other.clone()),
        }
    }

    /// ToPrimitive with hint "number"
    ///
    /// Objects are converted by calling `valueOf` and then `toString`; the
    /// first one returning a primitive wins.
    pub fn to_primitive_number(&self) -> JsResult<JsValue> {
        if !self.is_object_like() {
            return Ok(self.clone());
        }
        for name in ["valueOf", "toString"] {
            if let Some(method) = self.get(name).filter(JsValue::is_function) {
                let result = method.call(self, &[])?;
                if !result.is_object_like() {
                    return Ok(result);
                }
            }
        }
        Err(JsError::type_error("Cannot convert object to primitive value"))
    }

    /// ToNumber
    pub fn to_number(&self) -> JsResult<f64> {
        match self.to_primitive_number()? {
            JsValue::Undefined => Ok(f64::NAN),
            JsValue::Null => Ok(0.0),
            JsValue::Boolean(b) => Ok(if b { 1.0 } else { 0.0 }),
            JsValue::Number(n) => Ok(n),
            JsValue::String(s) => Ok(string_to_number(&s)),
            JsValue::Object(_) | JsValue::Date(_) | JsValue::Function(_) => Err(
                JsError::type_error("Cannot convert object to primitive value"),
            ),
        }
    }

    /// ToInt32
    pub fn to_int32(&self) -> JsResult<i32> {
        Ok(f64_to_int32(self.to_number()?))
    }
}

/// Modular conversion of a number to a signed 32-bit integer
pub fn f64_to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    const TWO_32: f64 = 4_294_967_296.0;
    const TWO_31: f64 = 2_147_483_648.0;
    let wrapped = n.trunc().rem_euclid(TWO_32);
    if wrapped >= TWO_31 {
        (wrapped - TWO_32) as i32
    } else {
        wrapped as i32
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        return digits
            .chars()
            .try_fold(0.0_f64, |acc, c| {
                c.to_digit(radix)
                    .map(|d| acc * f64::from(radix) + f64::from(d))
            })
            .unwrap_or(f64::NAN);
    }

    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust also accepts "inf" and "nan", which are not numeric literals here.
        _ if trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) =>
        {
            trimmed.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

impl Default for JsValue {
    fn default() -> Self {
        JsValue::Undefined
    }
}

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Null, JsValue::Null) => true,
            (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
            (JsValue::Number(a), JsValue::Number(b)) => a == b,
            (JsValue::String(a), JsValue::String(b)) => a == b,
            (JsValue::Object(a), JsValue::Object(b)) => Rc::ptr_eq(a, b),
            (JsValue::Date(a), JsValue::Date(b)) => a.ptr_eq(b),
            (JsValue::Function(a), JsValue::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
