//! Weekly availability: day-of-week x time-slot buckets.
//!
//! A worker's availability is a dense 7 x 3 matrix of booleans. Booking
//! requests are matched against it by deriving the bucket from the requested
//! calendar date and clock time.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::{ModelError, ModelResult};

/// Day of the week label used for availability rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    /// Day label for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownDay(s.to_string()))
    }
}

impl TryFrom<String> for DayOfWeek {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of three fixed partitions of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    /// Before 12:00
    Morning,
    /// 12:00 to 16:59
    Afternoon,
    /// 17:00 onward
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }

    /// Bucket a clock time by its hour component only.
    pub fn from_time(time: NaiveTime) -> Self {
        match time.hour() {
            0..=11 => TimeSlot::Morning,
            12..=16 => TimeSlot::Afternoon,
            _ => TimeSlot::Evening,
        }
    }
}

impl std::str::FromStr for TimeSlot {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownSlot(s.to_string()))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored availability cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AvailabilityEntry {
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub day_of_week: DayOfWeek,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub time_slot: TimeSlot,
    pub is_available: bool,
}

/// Nested `day -> slot -> available` map as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityMatrix(pub BTreeMap<DayOfWeek, BTreeMap<TimeSlot, bool>>);

impl AvailabilityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one cell.
    pub fn set(&mut self, day: DayOfWeek, slot: TimeSlot, available: bool) {
        self.0.entry(day).or_default().insert(slot, available);
    }

    /// Builder-style `set`.
    pub fn with(mut self, day: DayOfWeek, slot: TimeSlot, available: bool) -> Self {
        self.set(day, slot, available);
        self
    }

    pub fn is_available(&self, day: DayOfWeek, slot: TimeSlot) -> bool {
        self.0
            .get(&day)
            .and_then(|slots| slots.get(&slot))
            .copied()
            .unwrap_or(false)
    }

    /// Every day x slot cell, missing cells reported as unavailable.
    pub fn dense_entries(&self) -> Vec<AvailabilityEntry> {
        DayOfWeek::ALL
            .into_iter()
            .flat_map(|day| {
                TimeSlot::ALL.into_iter().map(move |slot| (day, slot))
            })
            .map(|(day, slot)| AvailabilityEntry {
                day_of_week: day,
                time_slot: slot,
                is_available: self.is_available(day, slot),
            })
            .collect()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = AvailabilityEntry>) -> Self {
        let mut matrix = Self::new();
        for entry in entries {
            matrix.set(entry.day_of_week, entry.time_slot, entry.is_available);
        }
        matrix
    }
}

/// Body of `POST /workers/:id/availability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability: AvailabilityMatrix,
}

/// Query string of `GET /workers/available`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub service_id: i64,
    pub date: String,
    pub time: String,
}

impl AvailabilityQuery {
    /// Parse the raw date/time strings and derive the availability bucket.
    pub fn slot_request(&self) -> ModelResult<SlotRequest> {
        let date = clock::parse_date(&self.date)?;
        let time = clock::parse_time(&self.time)?;
        Ok(SlotRequest::new(self.service_id, date, time))
    }
}

/// A fully parsed availability lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequest {
    pub service_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub day: DayOfWeek,
    pub slot: TimeSlot,
}

impl SlotRequest {
    pub fn new(service_id: i64, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            service_id,
            date,
            time,
            day: DayOfWeek::from_date(date),
            slot: TimeSlot::from_time(time),
        }
    }
}

/// A worker matching an availability lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AvailableWorker {
    pub worker_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub profile_pic: String,
    pub price_per_hour: f64,
}
