//! State types for tracking sync progress
//!
//! State is a flat JSON object mapping a stream id (or a filtered stream id
//! such as `deleted_tickets`) to its cursor. It is serialized to JSON and
//! persisted between runs.

use super::cursor::Cursor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete state for the connector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    bookmarks: BTreeMap<String, String>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw cursor string for a key
    pub fn get_cursor(&self, key: &str) -> Option<&str> {
        self.bookmarks.get(key).map(String::as_str)
    }

    /// Overwrite the cursor for a key
    pub fn set_cursor(&mut self, key: &str, cursor: impl Into<String>) {
        self.bookmarks.insert(key.to_string(), cursor.into());
    }

    /// Move the cursor for a key forward
    ///
    /// The stored value is only replaced when `cursor` is later than it.
    /// An unparseable stored value is treated as absent. Returns whether the
    /// state changed.
    pub fn advance(&mut self, key: &str, cursor: Cursor) -> bool {
        let current = self
            .bookmarks
            .get(key)
            .and_then(|c| c.parse::<Cursor>().ok());
        if current.is_some_and(|c| c >= cursor) {
            return false;
        }
        self.bookmarks.insert(key.to_string(), cursor.to_string());
        true
    }

    /// Whether no cursor is stored
    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Iterate stored cursors in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bookmarks.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
