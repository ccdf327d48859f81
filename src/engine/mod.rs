//! Execution engine module
//!
//! Main sync loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Drives the selected streams in catalog order
//! - `SyncContext` - What a stream sees while it runs
//! - Message types for output (Schema, Record, State)
//! - `IdCache` - Ticket ids shared between streams
//! - `SyncStats` - Counters for a run

mod context;
mod types;

pub use context::{flatten_custom_fields, SyncContext};
pub use types::{IdCache, Message, SyncStats};

use crate::config::{Catalog, CatalogEntry};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::MessageSink;
use crate::state::{Cursor, StateManager};
use crate::streams::{stream_for, StreamDefinition};
use std::time::Instant;
use tracing::info;

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// HTTP client
    client: HttpClient,
    /// State manager
    state: StateManager,
    /// Start date for streams without saved state
    start_date: Cursor,
    /// Ticket ids shared between streams
    id_cache: IdCache,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient, state: StateManager, start_date: Cursor) -> Self {
        Self {
            client,
            state,
            start_date,
            id_cache: IdCache::new(),
            stats: SyncStats::default(),
        }
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get the HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Starting cursor for a stream: saved state, else the start date
    pub async fn start_cursor(&self, stream_id: &str) -> Cursor {
        self.state.cursor(stream_id).await.unwrap_or(self.start_date)
    }

    /// Sync every selected stream of the catalog
    ///
    /// Selected streams are resolved before anything is emitted, so an
    /// unknown stream fails the run without partial output.
    pub async fn sync(&mut self, catalog: &Catalog, sink: &mut dyn MessageSink) -> Result<SyncStats> {
        let started = Instant::now();

        let mut plan: Vec<(&CatalogEntry, Box<dyn StreamDefinition>)> = Vec::new();
        for entry in &catalog.streams {
            if !entry.is_selected() {
                info!(stream = %entry.tap_stream_id, "Skipping stream as it is not selected");
                continue;
            }
            let definition = stream_for(&entry.tap_stream_id)
                .ok_or_else(|| Error::unknown_stream(&entry.tap_stream_id))?;
            plan.push((entry, definition));
        }

        info!(streams = plan.len(), "Starting Freshdesk sync");

        for (entry, definition) in plan {
            self.sync_stream(entry, definition.as_ref(), sink).await?;
        }

        sink.flush()?;
        self.stats.set_duration(started.elapsed().as_millis() as u64);

        info!(
            streams = self.stats.streams_synced,
            records = self.stats.records_synced,
            pages = self.stats.pages_fetched,
            checkpoints = self.stats.checkpoints,
            duration_ms = self.stats.duration_ms,
            "Sync complete"
        );

        Ok(self.stats.clone())
    }

    /// Sync one stream: SCHEMA, then the stream's records and checkpoints
    async fn sync_stream(
        &mut self,
        entry: &CatalogEntry,
        definition: &dyn StreamDefinition,
        sink: &mut dyn MessageSink,
    ) -> Result<()> {
        let stream_id = entry.tap_stream_id.as_str();

        sink.write_message(&Message::schema(
            stream_id,
            entry.schema.clone(),
            to_strings(definition.key_properties()),
            to_strings(definition.replication_keys()),
        ))?;

        let start = self.start_cursor(stream_id).await;
        info!(stream = stream_id, %start, "Syncing stream");

        let mut ctx = SyncContext::new(
            &self.client,
            &self.state,
            entry,
            sink,
            &mut self.id_cache,
            self.start_date,
        );
        definition.sync(&mut ctx, start).await?;
        let stream_stats = ctx.into_stats();

        info!(
            stream = stream_id,
            records = stream_stats.records_synced,
            skipped = stream_stats.records_skipped,
            pages = stream_stats.pages_fetched,
            "Finished stream"
        );

        self.stats.merge(&stream_stats);
        self.stats.add_stream();
        Ok(())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
