//! Text encodings for dates and timestamps stored in SQLite.
//!
//! Timestamps are fixed-width RFC 3339 in UTC with microseconds, so string
//! comparison in SQL orders them chronologically.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::errors::StorageError;

const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::SerializationError(format!("bad timestamp '{}': {}", value, e)))
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub fn parse_day(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|e| StorageError::SerializationError(format!("bad date '{}': {}", value, e)))
}
