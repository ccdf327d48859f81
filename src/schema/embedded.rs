//! Stream schemas embedded in the binary
//!
//! Every stream ships a static JSON schema under `schemas/`. Discovery
//! starts from these and layers the account's custom fields on top.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in stream schemas, keyed by stream id
pub static BUILTIN_SCHEMAS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        // Account
        m.insert("agents", include_str!("../../schemas/agents.json"));
        m.insert("groups", include_str!("../../schemas/groups.json"));
        m.insert("roles", include_str!("../../schemas/roles.json"));

        // Customers
        m.insert("companies", include_str!("../../schemas/companies.json"));
        m.insert("contacts", include_str!("../../schemas/contacts.json"));

        // Support
        m.insert("tickets", include_str!("../../schemas/tickets.json"));
        m.insert(
            "conversations",
            include_str!("../../schemas/conversations.json"),
        );
        m.insert(
            "satisfaction_ratings",
            include_str!("../../schemas/satisfaction_ratings.json"),
        );
        m.insert(
            "time_entries",
            include_str!("../../schemas/time_entries.json"),
        );

        m
    });

/// Get the raw schema text for a stream
pub fn get_builtin(stream_id: &str) -> Option<&'static str> {
    BUILTIN_SCHEMAS.get(stream_id).copied()
}

/// Check if a stream has a built-in schema
pub fn is_builtin(stream_id: &str) -> bool {
    BUILTIN_SCHEMAS.contains_key(stream_id)
}

/// Parse the built-in schema for a stream
pub fn load_schema(stream_id: &str) -> Result<JsonValue> {
    let raw = get_builtin(stream_id).ok_or_else(|| Error::unknown_stream(stream_id))?;
    serde_json::from_str(raw)
        .map_err(|e| Error::Other(format!("Embedded schema for '{stream_id}' is invalid: {e}")))
}
