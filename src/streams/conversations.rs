//! Conversations stream
//!
//! Conversations hang off individual tickets, so the stream walks the
//! cached ticket ids and pages through each ticket's conversations.

use super::tickets::ticket_ids;
use super::StreamDefinition;
use crate::engine::SyncContext;
use crate::error::Result;
use crate::pagination::{PageEvent, PageRequest};
use crate::state::Cursor;
use async_trait::async_trait;
use tracing::debug;

/// Conversations of every ticket
#[derive(Debug, Clone, Copy, Default)]
pub struct Conversations;

#[async_trait]
impl StreamDefinition for Conversations {
    fn stream_id(&self) -> &'static str {
        "conversations"
    }

    async fn sync(&self, ctx: &mut SyncContext<'_>, _start: Cursor) -> Result<()> {
        let client = ctx.client();

        for id in ticket_ids(ctx).await? {
            let mut pager = client.paginate(PageRequest::new(format!("tickets/{id}/conversations")));

            loop {
                match pager.next_page().await? {
                    PageEvent::Page(records) => {
                        ctx.record_page();
                        debug!(ticket_id = id, count = records.len(), "Emitting conversations");
                        for mut record in records {
                            if let Some(fields) = record.as_object_mut() {
                                fields.remove("attachments");
                                fields.remove("body");
                            }
                            ctx.emit_record(record)?;
                        }
                    }
                    PageEvent::Reset { .. } | PageEvent::Exhausted => break,
                }
            }
        }

        Ok(())
    }
}
