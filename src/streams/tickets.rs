//! Tickets stream
//!
//! Tickets are read in three passes: the default listing, then the
//! `deleted` and `spam` filters, which the default listing omits. Each pass
//! keeps its own cursor in state.

use super::incremental::sync_incremental;
use super::labels::{self, PRIORITY, SOURCE, STATUS};
use super::StreamDefinition;
use crate::engine::SyncContext;
use crate::error::Result;
use crate::pagination::{PageEvent, PageRequest};
use crate::state::Cursor;
use crate::types::{JsonValue, ReplicationMethod};
use async_trait::async_trait;
use tracing::{info, warn};

/// Ticket passes as (`filter` value, state key); the empty filter is the default listing
pub const TICKET_FILTERS: [(&str, &str); 3] = [
    ("", "tickets"),
    ("deleted", "deleted_tickets"),
    ("spam", "spam_tickets"),
];

/// Key under which enumerated ticket ids are cached
const TICKET_IDS_KEY: &str = "tickets";

/// Tickets, filtered with `updated_since`
#[derive(Debug, Clone, Copy, Default)]
pub struct Tickets;

fn base_request(start: Cursor) -> PageRequest {
    PageRequest::new("tickets")
        .filter("updated_since", start)
        .param("order_by", "updated_at")
        .param("order_type", "asc")
}

fn decorate_ticket(record: &mut JsonValue) {
    if let Some(fields) = record.as_object_mut() {
        fields.remove("attachments");
    }
    labels::add_label(record, "source", "source_label", SOURCE);
    labels::add_label(record, "status", "status_label", STATUS);
    labels::add_label(record, "priority", "priority_label", PRIORITY);
}

#[async_trait]
impl StreamDefinition for Tickets {
    fn stream_id(&self) -> &'static str {
        "tickets"
    }

    fn replication_method(&self) -> ReplicationMethod {
        ReplicationMethod::Incremental
    }

    fn replication_keys(&self) -> &'static [&'static str] {
        &["updated_at"]
    }

    fn custom_fields_endpoint(&self) -> Option<&'static str> {
        Some("ticket_fields")
    }

    async fn sync(&self, ctx: &mut SyncContext<'_>, start: Cursor) -> Result<()> {
        for (filter, state_key) in TICKET_FILTERS {
            let pass_start = if state_key == self.stream_id() {
                start
            } else {
                ctx.cursor_for(state_key).await
            };
            info!(filter, %pass_start, "Syncing tickets");

            let mut request = base_request(pass_start).param("include", "requester,company,stats");
            if !filter.is_empty() {
                request = request.param("filter", filter);
            }

            sync_incremental(ctx, request, state_key, pass_start, &decorate_ticket).await?;
        }
        Ok(())
    }
}

/// Ids of every ticket updated since the configured start date
///
/// The listing is walked once per process; later calls are served from the
/// context's id cache.
pub async fn ticket_ids(ctx: &mut SyncContext<'_>) -> Result<Vec<i64>> {
    if let Some(ids) = ctx.id_cache().get(TICKET_IDS_KEY) {
        return Ok(ids.to_vec());
    }

    let start = ctx.start_date();
    info!(%start, "Enumerating ticket ids");
    let client = ctx.client();
    let mut pager = client.paginate(base_request(start));
    let mut ids = Vec::new();

    loop {
        match pager.next_page().await? {
            PageEvent::Page(tickets) => {
                for ticket in &tickets {
                    match ticket.get("id").and_then(JsonValue::as_i64) {
                        Some(id) => ids.push(id),
                        None => warn!("Skipping ticket without an integer id"),
                    }
                }
            }
            PageEvent::Reset { cursor } => {
                let next = pager.request().with_cursor(cursor);
                pager = client.paginate(next);
            }
            PageEvent::Exhausted => break,
        }
    }

    info!(count = ids.len(), "Cached ticket ids");
    Ok(ctx.id_cache().insert(TICKET_IDS_KEY, ids).to_vec())
}
