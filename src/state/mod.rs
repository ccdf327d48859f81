//! State management module
//!
//! Handles cursor tracking, checkpointing, and resumability.
//! State is persisted between sync runs to enable incremental syncs.
//!
//! # Overview
//!
//! The state module provides:
//! - `Cursor` - Second-precision timestamp bookmark
//! - `State` - Flat mapping of stream id to cursor
//! - `StateManager` - File-based state persistence

mod cursor;
mod manager;
mod types;

pub use cursor::Cursor;
pub use manager::StateManager;
pub use types::State;

#[cfg(test)]
mod manager_tests;
