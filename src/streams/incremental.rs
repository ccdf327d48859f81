//! Incremental sync
//!
//! Shared page loop for streams filtered by an update timestamp, plus the
//! contacts stream that uses it directly.

use super::StreamDefinition;
use crate::engine::SyncContext;
use crate::error::Result;
use crate::pagination::{PageEvent, PageRequest};
use crate::state::Cursor;
use crate::types::{JsonValue, ReplicationMethod};
use async_trait::async_trait;
use tracing::{debug, info};

/// Page through a filtered listing, checkpointing after every page
///
/// Records whose cursor field is older than `start` are skipped. After each
/// page that carried a timestamp the cursor under `state_key` moves to the
/// newest timestamp + 1 second; the checkpoint happens only after the page's
/// records were emitted.
pub(crate) async fn sync_incremental(
    ctx: &mut SyncContext<'_>,
    request: PageRequest,
    state_key: &str,
    start: Cursor,
    decorate: &(dyn Fn(&mut JsonValue) + Send + Sync),
) -> Result<()> {
    let client = ctx.client();
    let cursor_field = request.cursor_field.clone();
    let mut pager = client.paginate(request);

    loop {
        match pager.next_page().await? {
            PageEvent::Page(records) => {
                ctx.record_page();
                let mut newest: Option<Cursor> = None;

                for mut record in records {
                    if let Some(ts) = Cursor::from_record(&record, &cursor_field)? {
                        if ts < start {
                            ctx.record_skipped();
                            continue;
                        }
                        newest = newest.max(Some(ts));
                    }
                    decorate(&mut record);
                    ctx.emit_record(record)?;
                }

                if let Some(newest) = newest {
                    ctx.checkpoint(state_key, newest.next_second()).await?;
                }
            }
            PageEvent::Reset { cursor } => {
                info!(key = state_key, %cursor, "Restarting listing after page ceiling");
                let next = pager.request().with_cursor(cursor);
                pager = client.paginate(next);
            }
            PageEvent::Exhausted => {
                debug!(key = state_key, "Listing exhausted");
                break;
            }
        }
    }

    Ok(())
}

/// Contacts, filtered with `_updated_since`
#[derive(Debug, Clone, Copy, Default)]
pub struct Contacts;

#[async_trait]
impl StreamDefinition for Contacts {
    fn stream_id(&self) -> &'static str {
        "contacts"
    }

    fn replication_method(&self) -> ReplicationMethod {
        ReplicationMethod::Incremental
    }

    fn replication_keys(&self) -> &'static [&'static str] {
        &["updated_at"]
    }

    fn custom_fields_endpoint(&self) -> Option<&'static str> {
        Some("contact_fields")
    }

    async fn sync(&self, ctx: &mut SyncContext<'_>, start: Cursor) -> Result<()> {
        let request = PageRequest::new("contacts").filter("_updated_since", start);
        sync_incremental(ctx, request, self.stream_id(), start, &|_| {}).await
    }
}
