//! Date string rendering
//!
//! Fixed layouts for the `to*String` family. Callers resolve an instant into
//! [`DateParts`] first; an invalid date never reaches these functions.

use thiserror::Error;

use crate::civil::CivilFields;
use crate::value::JsError;

/// Text produced for an invalid date by every layout except ISO
pub const INVALID_DATE: &str = "Invalid Date";

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Rendering failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The time value is NaN
    #[error("Invalid time value")]
    InvalidTimeValue,
}

impl From<FormatError> for JsError {
    fn from(err: FormatError) -> Self {
        JsError::range_error(err.to_string())
    }
}

/// Everything a layout may need about one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    /// Local civil breakdown
    pub local: CivilFields,
    /// UTC civil breakdown
    pub utc: CivilFields,
    /// Millisecond field, 0-999
    pub milliseconds: u16,
    /// Local offset east of UTC, in seconds
    pub offset_seconds: i32,
}

fn weekday_name(fields: &CivilFields) -> &'static str {
    WEEKDAYS[fields.weekday as usize % 7]
}

fn month_name(fields: &CivilFields) -> &'static str {
    MONTHS[fields.month as usize % 12]
}

/// Year with a sign for negative years and at least four digits
fn display_year(year: i32) -> String {
    if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{:04}", year)
    }
}

fn offset_string(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let minutes = offset_seconds.unsigned_abs() / 60;
    format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
}

/// `Tue Nov 05 2024`
pub fn date_string(parts: &DateParts) -> String {
    let local = &parts.local;
    format!(
        "{} {} {:02} {}",
        weekday_name(local),
        month_name(local),
        local.day,
        display_year(local.year)
    )
}

/// `14:30:00 GMT+0100`
pub fn time_string(parts: &DateParts) -> String {
    let local = &parts.local;
    format!(
        "{:02}:{:02}:{:02} GMT{}",
        local.hour,
        local.minute,
        local.second,
        offset_string(parts.offset_seconds)
    )
}

/// `Tue Nov 05 2024 14:30:00 GMT+0100`
pub fn string(parts: &DateParts) -> String {
    format!("{} {}", date_string(parts), time_string(parts))
}

/// `Tue, 05 Nov 2024 13:30:00 GMT`
pub fn gmt_string(parts: &DateParts) -> String {
    let utc = &parts.utc;
    format!(
        "{}, {:02} {} {} {:02}:{:02}:{:02} GMT",
        weekday_name(utc),
        utc.day,
        month_name(utc),
        display_year(utc.year),
        utc.hour,
        utc.minute,
        utc.second
    )
}

/// `2024-11-05T13:30:00.000Z`, with expanded `+YYYYYY` years outside 0-9999
pub fn iso_string(parts: &DateParts) -> String {
    let utc = &parts.utc;
    let year = if (0..=9999).contains(&utc.year) {
        format!("{:04}", utc.year)
    } else {
        let sign = if utc.year < 0 { '-' } else { '+' };
        format!("{}{:06}", sign, utc.year.unsigned_abs())
    };
    format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        utc.month + 1,
        utc.day,
        utc.hour,
        utc.minute,
        utc.second,
        parts.milliseconds
    )
}

/// `11/5/2024`
pub fn locale_date_string(parts: &DateParts) -> String {
    let local = &parts.local;
    format!("{}/{}/{}", local.month + 1, local.day, local.year)
}

/// `2:30:00 PM`
pub fn locale_time_string(parts: &DateParts) -> String {
    let local = &parts.local;
    let hour12 = match local.hour % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if local.hour < 12 { "AM" } else { "PM" };
    format!(
        "{}:{:02}:{:02} {}",
        hour12, local.minute, local.second, meridiem
    )
}

/// `11/5/2024, 2:30:00 PM`
pub fn locale_string(parts: &DateParts) -> String {
    format!(
        "{}, {}",
        locale_date_string(parts),
        locale_time_string(parts)
    )
}
