//! Full-table streams
//!
//! Listings without an update filter are paged through once per run.

use super::labels::{self, TICKET_SCOPE};
use super::StreamDefinition;
use crate::engine::SyncContext;
use crate::error::Result;
use crate::pagination::{PageEvent, PageRequest};
use crate::state::Cursor;
use crate::types::JsonValue;
use async_trait::async_trait;
use tracing::debug;

/// A stream that re-reads one endpoint in full
#[derive(Debug, Clone, Copy)]
pub struct FullTableStream {
    stream_id: &'static str,
    endpoint: &'static str,
    custom_fields: Option<&'static str>,
    decorate: fn(&mut JsonValue),
}

fn unchanged(_: &mut JsonValue) {}

fn agent_labels(record: &mut JsonValue) {
    labels::add_label(record, "ticket_scope", "ticket_label", TICKET_SCOPE);
}

impl FullTableStream {
    /// Create a stream over an endpoint
    pub const fn new(stream_id: &'static str, endpoint: &'static str) -> Self {
        Self {
            stream_id,
            endpoint,
            custom_fields: None,
            decorate: unchanged,
        }
    }

    /// Agents, with `ticket_scope` decoded into `ticket_label`
    pub const fn agents() -> Self {
        Self {
            decorate: agent_labels,
            ..Self::new("agents", "agents")
        }
    }

    /// Companies, with custom fields from `company_fields`
    pub const fn companies() -> Self {
        Self {
            custom_fields: Some("company_fields"),
            ..Self::new("companies", "companies")
        }
    }

    /// Groups
    pub const fn groups() -> Self {
        Self::new("groups", "groups")
    }

    /// Roles
    pub const fn roles() -> Self {
        Self::new("roles", "roles")
    }

    /// Time entries
    pub const fn time_entries() -> Self {
        Self::new("time_entries", "time_entries")
    }

    /// Endpoint path
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }
}

#[async_trait]
impl StreamDefinition for FullTableStream {
    fn stream_id(&self) -> &'static str {
        self.stream_id
    }

    fn custom_fields_endpoint(&self) -> Option<&'static str> {
        self.custom_fields
    }

    async fn sync(&self, ctx: &mut SyncContext<'_>, _start: Cursor) -> Result<()> {
        let client = ctx.client();
        let mut pager = client.paginate(PageRequest::new(self.endpoint));

        loop {
            match pager.next_page().await? {
                PageEvent::Page(records) => {
                    ctx.record_page();
                    debug!(stream = self.stream_id, count = records.len(), "Emitting page");
                    for mut record in records {
                        (self.decorate)(&mut record);
                        ctx.emit_record(record)?;
                    }
                }
                // Unfiltered listings never reset; the pager stops at the ceiling.
                PageEvent::Reset { .. } | PageEvent::Exhausted => break,
            }
        }

        Ok(())
    }
}
