//! ECMAScript Date object representation
//!
//! A Date pairs a second-precision [`CivilDateTime`] with a separate
//! millisecond field. The time value is always derived from the two, so the
//! timestamp and the civil breakdown can never disagree:
//!
//! - [`JsDate::rewrite`] replaces every second-precision field at once
//! - [`JsDate::set_milliseconds`] updates only the millisecond field
//!
//! Dates also carry ordinary own properties and a prototype link so that
//! methods can be found, and overridden, per object.

use std::cell::RefCell;
use std::rc::Rc;

use num_integer::Integer;

use crate::civil::{CivilDateTime, CivilFields};
use crate::config::{DateConfig, LocalZone};
use crate::format::{self, DateParts, FormatError, INVALID_DATE};
use crate::value::{JsValue, ObjectData};

/// Largest magnitude of a time value, in milliseconds
pub const MAX_TIME_VALUE: f64 = 8.64e15;

/// Internal Date state
#[derive(Debug)]
pub struct DateObject {
    datetime: CivilDateTime,
    /// Millisecond field, 0-999; meaningless while `datetime` is invalid
    milliseconds: u16,
    object: ObjectData,
}

/// Shared handle to a Date object
#[derive(Debug, Clone)]
pub struct JsDate {
    inner: Rc<RefCell<DateObject>>,
}

impl JsDate {
    fn from_parts(datetime: CivilDateTime, milliseconds: u16) -> Self {
        JsDate {
            inner: Rc::new(RefCell::new(DateObject {
                datetime,
                milliseconds,
                object: ObjectData::default(),
            })),
        }
    }

    /// Create a Date from milliseconds since epoch
    ///
    /// NaN, infinities and values beyond ±8.64e15 produce an invalid date.
    pub fn from_timestamp(ms: f64, config: &DateConfig) -> Self {
        let zone = config.local_zone;
        if !ms.is_finite() || ms.abs() > MAX_TIME_VALUE {
            return Self::from_parts(CivilDateTime::invalid(zone), 0);
        }
        let (seconds, millis) = (ms.trunc() as i64).div_mod_floor(&1000);
        Self::from_parts(
            CivilDateTime::from_epoch_seconds(seconds, zone),
            millis as u16,
        )
    }

    /// Create a Date with the current time
    pub fn now(config: &DateConfig) -> Self {
        Self::from_timestamp(chrono::Utc::now().timestamp_millis() as f64, config)
    }

    /// Create an invalid date (NaN time value)
    pub fn invalid(config: &DateConfig) -> Self {
        Self::from_parts(CivilDateTime::invalid(config.local_zone), 0)
    }

    /// Create a Date from local civil components
    ///
    /// Month is 0-indexed. Out-of-range components roll over into the
    /// neighbouring fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_local_components(
        config: &DateConfig,
        year: i32,
        month: i32,
        day: i32,
        hours: i32,
        minutes: i32,
        seconds: i32,
        ms: i32,
    ) -> Self {
        let (carry, millis) = i64::from(ms).div_mod_floor(&1000);
        let mut datetime = CivilDateTime::invalid(config.local_zone);
        datetime.set_time(
            year.into(),
            month.into(),
            day.into(),
            hours.into(),
            minutes.into(),
            i64::from(seconds) + carry,
        );
        Self::from_parts(datetime, millis as u16)
    }

    /// Get the internal time value (milliseconds since epoch)
    pub fn time(&self) -> f64 {
        let inner = self.inner.borrow();
        inner
            .datetime
            .epoch_seconds()
            .map_or(f64::NAN, |secs| {
                (secs * 1000 + i64::from(inner.milliseconds)) as f64
            })
    }

    /// Check if the date is valid (not NaN)
    pub fn is_valid(&self) -> bool {
        self.inner.borrow().datetime.is_valid()
    }

    /// Zone of the local breakdown
    pub fn zone(&self) -> LocalZone {
        self.inner.borrow().datetime.zone()
    }

    /// Local civil breakdown, `None` for an invalid date
    pub fn local(&self) -> Option<CivilFields> {
        self.inner.borrow().datetime.local()
    }

    /// Local breakdown, or that of time value +0 for an invalid date
    pub fn local_or_epoch(&self) -> CivilFields {
        self.local().unwrap_or_else(|| {
            CivilDateTime::from_epoch_seconds(0, self.zone())
                .local()
                .unwrap_or(CivilFields::UNIX_EPOCH)
        })
    }

    /// UTC civil breakdown, `None` for an invalid date
    pub fn utc(&self) -> Option<CivilFields> {
        self.inner.borrow().datetime.utc()
    }

    /// Millisecond field, `None` for an invalid date
    pub fn milliseconds(&self) -> Option<u16> {
        let inner = self.inner.borrow();
        inner.datetime.is_valid().then_some(inner.milliseconds)
    }

    /// Local offset east of UTC, in seconds
    pub fn offset_seconds(&self) -> Option<i32> {
        self.inner.borrow().datetime.offset_seconds()
    }

    /// Write the millisecond field alone
    ///
    /// Changes the time value but leaves the civil breakdown untouched;
    /// `milliseconds` must already be reduced to 0-999.
    pub fn set_milliseconds(&self, milliseconds: u16) {
        debug_assert!(milliseconds < 1000);
        self.inner.borrow_mut().milliseconds = milliseconds;
    }

    /// Atomically rewrite the local civil fields and return the new time value
    pub fn rewrite(
        &self,
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
    ) -> f64 {
        self.inner
            .borrow_mut()
            .datetime
            .set_time(year, month, day, hour, minute, second);
        self.time()
    }

    /// Everything the renderer needs, `None` for an invalid date
    pub fn parts(&self) -> Option<DateParts> {
        let inner = self.inner.borrow();
        let datetime = &inner.datetime;
        Some(DateParts {
            local: datetime.local()?,
            utc: datetime.utc()?,
            milliseconds: inner.milliseconds,
            offset_seconds: datetime.offset_seconds()?,
        })
    }

    fn render(&self, layout: fn(&DateParts) -> String) -> String {
        self.parts()
            .map_or_else(|| INVALID_DATE.to_string(), |parts| layout(&parts))
    }

    /// Date.prototype.toString layout
    pub fn string(&self) -> String {
        self.render(format::string)
    }

    /// Date.prototype.toDateString layout
    pub fn date_string(&self) -> String {
        self.render(format::date_string)
    }

    /// Date.prototype.toTimeString layout
    pub fn time_string(&self) -> String {
        self.render(format::time_string)
    }

    /// Date.prototype.toGMTString layout
    pub fn gmt_string(&self) -> String {
        self.render(format::gmt_string)
    }

    /// Date.prototype.toISOString layout; fails for an invalid date
    pub fn iso_string(&self) -> Result<String, FormatError> {
        self.parts()
            .map(|parts| format::iso_string(&parts))
            .ok_or(FormatError::InvalidTimeValue)
    }

    /// Date.prototype.toLocaleString layout
    pub fn locale_string(&self) -> String {
        self.render(format::locale_string)
    }

    /// Date.prototype.toLocaleDateString layout
    pub fn locale_date_string(&self) -> String {
        self.render(format::locale_date_string)
    }

    /// Date.prototype.toLocaleTimeString layout
    pub fn locale_time_string(&self) -> String {
        self.render(format::locale_time_string)
    }

    pub(crate) fn set_property(&self, key: &str, value: JsValue) {
        self.inner
            .borrow_mut()
            .object
            .properties
            .insert(key.to_string(), value);
    }

    pub(crate) fn own_property(&self, key: &str) -> Option<JsValue> {
        self.inner.borrow().object.properties.get(key).cloned()
    }

    pub(crate) fn prototype(&self) -> Option<JsValue> {
        self.inner.borrow().object.prototype.clone()
    }

    pub(crate) fn set_prototype(&self, proto: &JsValue) {
        self.inner.borrow_mut().object.prototype = Some(proto.clone());
    }

    /// Whether both handles refer to the same Date object
    pub fn ptr_eq(&self, other: &JsDate) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
