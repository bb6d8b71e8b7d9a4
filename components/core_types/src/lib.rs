//! Core JavaScript error handling shared by the runtime components.
//!
//! # Overview
//!
//! - [`JsError`] - JavaScript errors returned by native functions
//! - [`ErrorKind`] - Types of JavaScript errors
//! - [`JsResult`] - Result alias used for abrupt completions
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, JsResult};
//!
//! fn require_positive(n: f64) -> JsResult<f64> {
//!     if n > 0.0 {
//!         Ok(n)
//!     } else {
//!         Err(JsError::range_error("expected a positive number"))
//!     }
//! }
//!
//! let err = require_positive(-1.0).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::RangeError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;

pub use error::{ErrorKind, JsError, JsResult};
