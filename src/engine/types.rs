//! Engine types
//!
//! Message types and statistics for the sync engine.

use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A message emitted during sync
///
/// Serialized as one JSON object per line with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Stream schema, emitted once before the stream's records
    Schema {
        /// Stream name
        stream: String,
        /// JSON schema of the records
        schema: JsonValue,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key fields
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// A single record
    Record {
        /// Stream name
        stream: String,
        /// The record, already conformed to the schema
        record: JsonValue,
        /// When the record was extracted
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_extracted: Option<DateTime<Utc>>,
    },
    /// Full state snapshot
    State {
        /// State data (stream key -> cursor)
        value: JsonValue,
    },
}

impl Message {
    /// Create a schema message
    pub fn schema(
        stream: impl Into<String>,
        schema: JsonValue,
        key_properties: Vec<String>,
        bookmark_properties: Vec<String>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties,
            bookmark_properties,
        }
    }

    /// Create a record message stamped with the current time
    pub fn record(stream: impl Into<String>, record: JsonValue) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted: Some(Utc::now()),
        }
    }

    /// Create a state message
    pub fn state(value: JsonValue) -> Self {
        Self::State { value }
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }

    /// Stream the message belongs to (state messages belong to none)
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::State { .. } => None,
        }
    }
}

/// Ticket ids collected once per process, keyed by the enumerating stream
///
/// Streams that fan out per ticket read the ids from here instead of
/// listing tickets again.
#[derive(Debug, Clone, Default)]
pub struct IdCache {
    ids: HashMap<String, Vec<i64>>,
}

impl IdCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached ids for a key, if they were collected
    pub fn get(&self, key: &str) -> Option<&[i64]> {
        self.ids.get(key).map(Vec::as_slice)
    }

    /// Store ids for a key; an existing entry is kept
    pub fn insert(&mut self, key: impl Into<String>, ids: Vec<i64>) -> &[i64] {
        self.ids.entry(key.into()).or_insert(ids)
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records emitted
    pub records_synced: usize,
    /// Records skipped as older than the stream's starting cursor
    pub records_skipped: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// State checkpoints written
    pub checkpoints: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add skipped records
    pub fn add_skipped(&mut self, count: usize) {
        self.records_skipped += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a checkpoint
    pub fn add_checkpoint(&mut self) {
        self.checkpoints += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Fold another run's counters into this one
    pub fn merge(&mut self, other: &SyncStats) {
        self.records_synced += other.records_synced;
        self.records_skipped += other.records_skipped;
        self.pages_fetched += other.pages_fetched;
        self.checkpoints += other.checkpoints;
        self.streams_synced += other.streams_synced;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
