//! Per-stream sync context
//!
//! Everything a stream needs while it runs: the shared client, cursors from
//! state, the message sink, and the process-wide id cache.

use super::types::{IdCache, Message, SyncStats};
use crate::config::CatalogEntry;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::MessageSink;
use crate::schema::transform_record;
use crate::state::{Cursor, StateManager};
use crate::types::JsonValue;
use tracing::debug;

/// Merge a record's `custom_fields` object into its top level
///
/// The `custom_fields` key is always removed.
pub fn flatten_custom_fields(record: &mut JsonValue) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    if let Some(JsonValue::Object(custom)) = fields.remove("custom_fields") {
        for (name, value) in custom {
            fields.insert(name, value);
        }
    }
}

/// Context handed to a stream's `sync`
pub struct SyncContext<'a> {
    client: &'a HttpClient,
    state: &'a StateManager,
    entry: &'a CatalogEntry,
    sink: &'a mut dyn MessageSink,
    id_cache: &'a mut IdCache,
    start_date: Cursor,
    stats: SyncStats,
}

impl<'a> SyncContext<'a> {
    /// Create a context for one stream
    pub fn new(
        client: &'a HttpClient,
        state: &'a StateManager,
        entry: &'a CatalogEntry,
        sink: &'a mut dyn MessageSink,
        id_cache: &'a mut IdCache,
        start_date: Cursor,
    ) -> Self {
        Self {
            client,
            state,
            entry,
            sink,
            id_cache,
            start_date,
            stats: SyncStats::new(),
        }
    }

    /// The shared API client
    pub fn client(&self) -> &'a HttpClient {
        self.client
    }

    /// Id of the stream being synced
    pub fn stream_id(&self) -> &str {
        &self.entry.tap_stream_id
    }

    /// The configured start date
    pub fn start_date(&self) -> Cursor {
        self.start_date
    }

    /// Saved cursor for a state key, else the configured start date
    pub async fn cursor_for(&mut self, key: &str) -> Cursor {
        self.state.cursor(key).await.unwrap_or(self.start_date)
    }

    /// Process-wide id cache
    pub fn id_cache(&mut self) -> &mut IdCache {
        &mut *self.id_cache
    }

    /// Flatten custom fields, conform the record to the catalog schema and
    /// emit it
    pub fn emit_record(&mut self, mut record: JsonValue) -> Result<()> {
        flatten_custom_fields(&mut record);
        let record = transform_record(record, self.entry).map_err(|e| match e {
            Error::Transform { path, message } => Error::Transform {
                path: format!("{}.{path}", self.entry.tap_stream_id),
                message,
            },
            other => other,
        })?;

        self.sink
            .write_message(&Message::record(self.entry.tap_stream_id.clone(), record))?;
        self.stats.add_records(1);
        Ok(())
    }

    /// Advance the cursor under `key` and emit the full state
    ///
    /// Records already written are flushed before state is persisted, so a
    /// failed flush leaves the saved cursor where it was.
    pub async fn checkpoint(&mut self, key: &str, cursor: Cursor) -> Result<()> {
        self.sink.flush()?;
        let advanced = self.state.advance_cursor(key, cursor).await?;
        let value = serde_json::to_value(self.state.snapshot().await)?;
        self.sink.write_message(&Message::state(value))?;
        self.stats.add_checkpoint();
        debug!(key, %cursor, advanced, "Checkpoint");
        Ok(())
    }

    /// Count a fetched page
    pub fn record_page(&mut self) {
        self.stats.add_page();
    }

    /// Count a record skipped as older than the starting cursor
    pub fn record_skipped(&mut self) {
        self.stats.add_skipped(1);
    }

    /// Counters so far
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Finish and return the counters
    pub fn into_stats(self) -> SyncStats {
        self.stats
    }
}
