//! ECMAScript Date.prototype core
//!
//! This crate provides the Date object and the native methods of its
//! prototype:
//! - Accessors for the local and UTC civil fields
//! - Mutators that convert their arguments and rewrite the date atomically
//! - String formatting (`toString`, `toISOString`, locale variants, ...)
//! - The generic `toJSON` method
//!
//! # Example
//!
//! ```
//! use date_builtins::{DateConfig, DatePrototype, JsDate, JsValue};
//!
//! let config = DateConfig::utc();
//! let prototype = DatePrototype::create();
//! let date = DatePrototype::instantiate(&prototype, JsDate::from_timestamp(0.0, &config));
//!
//! let t = date.invoke("setMilliseconds", &[JsValue::number(1500.0)]).unwrap();
//! assert_eq!(t, JsValue::number(1500.0));
//! assert_eq!(
//!     date.invoke("toISOString", &[]).unwrap(),
//!     JsValue::string("1970-01-01T00:00:01.500Z")
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod civil;
pub mod config;
pub mod date;
pub mod date_prototype;
pub mod format;
pub mod value;

// Re-export main types for convenience
pub use civil::{CivilDateTime, CivilFields};
pub use config::{ConfigError, DateConfig, LocalZone};
pub use date::JsDate;
pub use date_prototype::{DatePrototype, NativeMethod, DATE_PROTOTYPE_METHODS};
pub use format::FormatError;
pub use value::{ErrorKind, JsError, JsResult, JsValue};
