//! Date runtime configuration
//!
//! Selects the time zone that defines the *local* civil breakdown of a Date.

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;

/// Environment variable read by [`DateConfig::from_env`]
pub const UTC_OFFSET_ENV: &str = "JS_DATE_UTC_OFFSET";

/// Errors produced while building a [`DateConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The offset text is not `Z`, `UTC`, `+HH:MM` or `-HH:MM`
    #[error("invalid UTC offset {0:?}: expected Z, UTC, +HH:MM or -HH:MM")]
    InvalidOffset(String),
    /// The offset is syntactically valid but out of range
    #[error("UTC offset {0:?} is out of range")]
    OffsetOutOfRange(String),
}

/// Time zone used for local-time accessors and mutators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The host system's time zone (including DST rules)
    #[default]
    System,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

/// Configuration shared by every Date created through it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateConfig {
    /// Zone used for the local civil breakdown
    pub local_zone: LocalZone,
}

impl DateConfig {
    /// Use the host system's time zone
    pub fn system() -> Self {
        DateConfig {
            local_zone: LocalZone::System,
        }
    }

    /// Use UTC as local time
    pub fn utc() -> Self {
        DateConfig {
            local_zone: LocalZone::Fixed(Utc.fix()),
        }
    }

    /// Use a fixed offset east of UTC, in minutes
    pub fn fixed_offset_minutes(minutes: i32) -> Result<Self, ConfigError> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::OffsetOutOfRange(minutes.to_string()))?;
        Ok(DateConfig {
            local_zone: LocalZone::Fixed(offset),
        })
    }

    /// Read the local zone from `JS_DATE_UTC_OFFSET`
    ///
    /// Falls back to the system zone when the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(UTC_OFFSET_ENV) {
            Ok(text) => {
                let config = Self::parse_offset(&text)?;
                tracing::debug!(offset = %text, "using fixed local zone from environment");
                Ok(config)
            }
            Err(_) => Ok(Self::system()),
        }
    }

    /// Parse `Z`, `UTC`, `+HH:MM`, `-HH:MM` (or `+HHMM`)
    pub fn parse_offset(text: &str) -> Result<Self, ConfigError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }

        let invalid = || ConfigError::InvalidOffset(text.to_string());
        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
            None => return Err(invalid()),
        };
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(ConfigError::OffsetOutOfRange(text.to_string()));
        }
        Self::fixed_offset_minutes(sign * (hours * 60 + minutes))
    }
}
