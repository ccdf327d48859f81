//! Output module
//!
//! Delivers engine messages to their destination.
//!
//! # Overview
//!
//! This module provides:
//! - `MessageSink` - Destination for SCHEMA, RECORD and STATE messages
//! - `JsonLinesWriter` - One JSON object per line on any `io::Write` (stdout in the binary)
//! - `MemorySink` - Collects messages in memory

mod writer;

pub use writer::{JsonLinesWriter, MemorySink, MessageSink};

#[cfg(test)]
mod tests;
