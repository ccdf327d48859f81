//! Replication cursor
//!
//! A cursor is a UTC timestamp with second precision. It is rendered in the
//! `2024-01-31T12:00:00Z` form the Freshdesk filters expect, and compares
//! chronologically.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const CURSOR_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Second-precision UTC timestamp marking replication progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(DateTime<Utc>);

impl Cursor {
    /// Create a cursor, dropping sub-second precision
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at.trunc_subsecs(0))
    }

    /// The cursor one second later
    ///
    /// Filters are inclusive, so resuming from `last + 1s` never replays the
    /// last processed record.
    #[must_use]
    pub fn next_second(self) -> Self {
        Self(self.0 + TimeDelta::seconds(1))
    }

    /// Read a cursor from a record field
    ///
    /// Returns `Ok(None)` when the field is absent or null.
    pub fn from_record(record: &JsonValue, field: &str) -> Result<Option<Self>> {
        match record.get(field) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::String(s)) => s.parse().map(Some),
            Some(other) => Err(Error::invalid_timestamp(other.to_string())),
        }
    }

    /// The underlying timestamp
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl FromStr for Cursor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::new(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self::new(naive.and_utc()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self::new(midnight.and_utc()));
            }
        }
        Err(Error::invalid_timestamp(s))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CURSOR_FORMAT))
    }
}

impl From<DateTime<Utc>> for Cursor {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at)
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
