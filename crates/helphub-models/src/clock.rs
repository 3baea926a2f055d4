//! Calendar date and wall-clock time parsing for booking requests.
//!
//! Dates are `YYYY-MM-DD`. Times are accepted as `HH:MM` or `HH:MM:SS` and
//! serialized back as `HH:MM`.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{ModelError, ModelResult};

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> ModelResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ModelError::InvalidDate(s.to_string()))
}

/// Parse an `HH:MM` or `HH:MM:SS` clock time.
pub fn parse_time(s: &str) -> ModelResult<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ModelError::InvalidTime(s.to_string()))
}

/// Format a clock time as `HH:MM`.
pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter for `NaiveTime` fields using the `HH:MM` wire format.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}
