//! Stream definitions
//!
//! One definition per Freshdesk entity.
//!
//! # Overview
//!
//! | Stream | Endpoint | Replication |
//! |--------|----------|-------------|
//! | agents | `agents` | full table |
//! | companies | `companies` | full table |
//! | contacts | `contacts` | incremental on `updated_at` |
//! | groups | `groups` | full table |
//! | roles | `roles` | full table |
//! | tickets | `tickets` (plus `deleted` and `spam` filters) | incremental on `updated_at` |
//! | conversations | `tickets/{id}/conversations` | full table |
//! | satisfaction_ratings | `surveys/satisfaction_ratings` | incremental on `created_at` |
//! | time_entries | `time_entries` | full table |

mod conversations;
mod full_table;
mod incremental;
pub mod labels;
mod satisfaction_ratings;
mod tickets;

pub use conversations::Conversations;
pub use full_table::FullTableStream;
pub use incremental::Contacts;
pub use satisfaction_ratings::{expand_ratings, SatisfactionRatings};
pub use tickets::{ticket_ids, Tickets, TICKET_FILTERS};

use crate::engine::SyncContext;
use crate::error::Result;
use crate::state::Cursor;
use crate::types::ReplicationMethod;
use async_trait::async_trait;

/// Behaviour shared by every stream
#[async_trait]
pub trait StreamDefinition: Send + Sync {
    /// Stream id used in the catalog, messages and state
    fn stream_id(&self) -> &'static str;

    /// Primary key fields
    fn key_properties(&self) -> &'static [&'static str] {
        &["id"]
    }

    /// How the stream is replicated
    fn replication_method(&self) -> ReplicationMethod {
        ReplicationMethod::FullTable
    }

    /// Fields that carry the replication cursor
    fn replication_keys(&self) -> &'static [&'static str] {
        &[]
    }

    /// Endpoint listing the account's custom fields for this entity
    fn custom_fields_endpoint(&self) -> Option<&'static str> {
        None
    }

    /// Emit every record of the stream from `start` onwards
    async fn sync(&self, ctx: &mut SyncContext<'_>, start: Cursor) -> Result<()>;
}

/// Every stream, in discovery order
pub fn all_streams() -> Vec<Box<dyn StreamDefinition>> {
    vec![
        Box::new(FullTableStream::agents()),
        Box::new(FullTableStream::companies()),
        Box::new(Contacts),
        Box::new(FullTableStream::groups()),
        Box::new(FullTableStream::roles()),
        Box::new(Tickets),
        Box::new(Conversations),
        Box::new(SatisfactionRatings),
        Box::new(FullTableStream::time_entries()),
    ]
}

/// Look up a stream by id
pub fn stream_for(stream_id: &str) -> Option<Box<dyn StreamDefinition>> {
    all_streams()
        .into_iter()
        .find(|s| s.stream_id() == stream_id)
}

#[cfg(test)]
mod tests;
