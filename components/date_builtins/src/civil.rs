//! Civil date-time engine
//!
//! Owns the second-precision part of a Date: the epoch seconds and the local
//! civil breakdown derived from them. Both are only ever replaced together,
//! either from an epoch value or through [`CivilDateTime::set_time`], which
//! normalizes out-of-range fields the way calendar arithmetic rolls over
//! (month 12 is January of the next year, day 0 is the last day of the
//! previous month, negative seconds borrow from the minute, and so on).

use chrono::{
    DateTime, Datelike, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike,
};
use num_integer::Integer;

use crate::config::LocalZone;

/// Largest representable distance from the epoch, in seconds (8.64e15 ms)
pub const MAX_EPOCH_SECONDS: i64 = 8_640_000_000_000;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

const SECONDS_PER_DAY: i64 = 86_400;

/// One civil breakdown, either local or UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilFields {
    /// Full year, may be negative or above 9999
    pub year: i32,
    /// Month, 0 = January
    pub month: u32,
    /// Day of month, 1-31
    pub day: u32,
    /// Hours, 0-23
    pub hour: u32,
    /// Minutes, 0-59
    pub minute: u32,
    /// Seconds, 0-59
    pub second: u32,
    /// Day of week, 0 = Sunday
    pub weekday: u32,
}

impl CivilFields {
    /// 1970-01-01T00:00:00, a Thursday
    pub const UNIX_EPOCH: CivilFields = CivilFields {
        year: 1970,
        month: 0,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        weekday: 4,
    };

    fn from_naive(dt: &NaiveDateTime) -> Self {
        CivilFields {
            year: dt.year(),
            month: dt.month0(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            weekday: dt.weekday().num_days_from_sunday(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Instant {
    epoch_seconds: i64,
    local: NaiveDateTime,
    offset_seconds: i32,
}

/// Second-precision civil date-time in a configured local zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CivilDateTime {
    zone: LocalZone,
    instant: Option<Instant>,
}

impl CivilDateTime {
    /// Build from seconds since the epoch; out-of-range values are invalid
    pub fn from_epoch_seconds(epoch_seconds: i64, zone: LocalZone) -> Self {
        CivilDateTime {
            zone,
            instant: instant_at(zone, epoch_seconds),
        }
    }

    /// An invalid (NaN) date-time
    pub fn invalid(zone: LocalZone) -> Self {
        CivilDateTime {
            zone,
            instant: None,
        }
    }

    /// Whether the date-time holds a real instant
    pub fn is_valid(&self) -> bool {
        self.instant.is_some()
    }

    /// The zone that defines the local breakdown
    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    /// Seconds since the epoch, floored
    pub fn epoch_seconds(&self) -> Option<i64> {
        self.instant.map(|i| i.epoch_seconds)
    }

    /// Local offset east of UTC at this instant, in seconds
    pub fn offset_seconds(&self) -> Option<i32> {
        self.instant.map(|i| i.offset_seconds)
    }

    /// Local civil breakdown
    pub fn local(&self) -> Option<CivilFields> {
        self.instant.map(|i| CivilFields::from_naive(&i.local))
    }

    /// UTC civil breakdown
    pub fn utc(&self) -> Option<CivilFields> {
        let instant = self.instant?;
        DateTime::from_timestamp(instant.epoch_seconds, 0)
            .map(|dt| CivilFields::from_naive(&dt.naive_utc()))
    }

    /// Atomically rewrite every field from a local civil tuple
    ///
    /// Fields are normalized before conversion, so any combination of
    /// out-of-range values produces a real instant as long as the result
    /// stays within [`MAX_EPOCH_SECONDS`]. Otherwise the date-time becomes
    /// invalid and `None` is returned.
    pub fn set_time(
        &mut self,
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
    ) -> Option<i64> {
        tracing::trace!(year, month, day, hour, minute, second, "civil rewrite");

        let epoch_seconds = local_epoch_seconds(year, month, day, hour, minute, second)
            .and_then(|local_seconds| DateTime::from_timestamp(local_seconds, 0))
            .map(|local| local_to_epoch_seconds(self.zone, &local.naive_utc()));

        self.instant = epoch_seconds.and_then(|secs| instant_at(self.zone, secs));
        if self.instant.is_none() {
            tracing::debug!(year, month, day, hour, minute, second, "civil rewrite out of range");
        }
        self.epoch_seconds()
    }
}

/// Seconds since the epoch of a normalized civil tuple, read as if it were UTC
fn local_epoch_seconds(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> Option<i64> {
    let (carry_years, month0) = month.div_mod_floor(&12);
    let year = i32::try_from(year.checked_add(carry_years)?).ok()?;
    let first_of_month = NaiveDate::from_ymd_opt(year, month0 as u32 + 1, 1)?;
    let days = i64::from(first_of_month.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE;
    let days = days.checked_add(day.checked_sub(1)?)?;

    days.checked_mul(SECONDS_PER_DAY)?
        .checked_add(hour.checked_mul(3600)?)?
        .checked_add(minute.checked_mul(60)?)?
        .checked_add(second)
}

fn instant_at(zone: LocalZone, epoch_seconds: i64) -> Option<Instant> {
    if epoch_seconds.abs() > MAX_EPOCH_SECONDS {
        return None;
    }
    let utc = DateTime::from_timestamp(epoch_seconds, 0)?.naive_utc();
    let offset_seconds = match zone {
        LocalZone::System => Local.offset_from_utc_datetime(&utc).fix().local_minus_utc(),
        LocalZone::Fixed(offset) => offset.local_minus_utc(),
    };
    let local = utc.checked_add_signed(chrono::Duration::seconds(i64::from(offset_seconds)))?;
    Some(Instant {
        epoch_seconds,
        local,
        offset_seconds,
    })
}

fn local_to_epoch_seconds(zone: LocalZone, local: &NaiveDateTime) -> i64 {
    let offset = match zone {
        LocalZone::Fixed(offset) => offset,
        LocalZone::System => match Local.offset_from_local_datetime(local) {
            LocalResult::Single(offset) => offset.fix(),
            // Repeated wall-clock time: take the earlier instant.
            LocalResult::Ambiguous(earlier, _) => earlier.fix(),
            // Skipped wall-clock time: use the offset in effect before the gap.
            LocalResult::None => {
                let before = local
                    .checked_sub_signed(chrono::Duration::days(1))
                    .unwrap_or(*local);
                Local.offset_from_utc_datetime(&before).fix()
            }
        },
    };
    local.and_utc().timestamp() - i64::from(offset.local_minus_utc())
}
