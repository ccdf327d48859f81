// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Freshdesk Connector
//!
//! Extracts helpdesk data from the Freshdesk v2 REST API and writes it as
//! a stream of SCHEMA, RECORD and STATE messages (one JSON object per line).
//!
//! ## Features
//!
//! - **Discovery**: Static stream schemas extended with account custom fields
//! - **Incremental Sync**: Per-stream timestamp cursors with resumable state
//! - **Deep Pagination**: Page ceiling handled by restarting from the last cursor
//! - **Rate Limiting**: Sliding-window request budget shared by every stream
//! - **Retry**: Exponential backoff, `Retry-After` handling, give-up on 4xx
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use freshdesk_connector::config::{Catalog, ConnectorConfig};
//! use freshdesk_connector::connector::FreshdeskConnector;
//! use freshdesk_connector::output::JsonLinesWriter;
//! use freshdesk_connector::state::StateManager;
//!
//! #[tokio::main]
//! async fn main() -> freshdesk_connector::Result<()> {
//!     let config = ConnectorConfig::from_file("config.json")?;
//!     let connector = FreshdeskConnector::new(config)?;
//!
//!     // Discover available streams and select them all
//!     let mut catalog = connector.discover().await?;
//!     catalog.streams.iter_mut().for_each(|s| s.select());
//!
//!     // Sync, persisting state to disk at every checkpoint
//!     let state = StateManager::from_file("state.json")?;
//!     let mut out = JsonLinesWriter::stdout();
//!     connector.sync(&catalog, state, &mut out).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Connector                               │
//! │      check() → Status    discover() → Catalog    sync()         │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Streams  │   HTTP    │   Paginate    │  Schema   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Tickets  │ Basic auth│ Page number   │ Embedded  │ JSON lines  │
//! │ Contacts │ Retry     │ Page ceiling  │ Custom    │ SCHEMA      │
//! │ Ratings  │ Rate Limit│ Cursor reset  │ Transform │ RECORD/STATE│
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Page-number pagination with ceiling resets
pub mod pagination;

/// State management and checkpointing
pub mod state;

/// Message output
pub mod output;

/// Main execution engine
pub mod engine;

/// Configuration and catalog types
pub mod config;

/// Check, discover and sync entry points
pub mod connector;

/// Command-line interface
pub mod cli;

/// Stream schemas, discovery and record transform
pub mod schema;

/// Freshdesk stream definitions
pub mod streams;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use connector::{CheckResult, FreshdeskConnector};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
