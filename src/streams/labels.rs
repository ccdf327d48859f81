//! Integer enum decoding
//!
//! Freshdesk returns several fields as integer codes. Each table here maps
//! a code to its display label; codes outside a table decode to `null`.

use crate::types::JsonValue;

/// Label lookup table
pub type LabelTable = &'static [(i64, &'static str)];

/// Agent `ticket_scope`
pub const TICKET_SCOPE: LabelTable = &[
    (1, "Global Access"),
    (2, "Group Access"),
    (3, "Restricted Access"),
];

/// Ticket `source`
pub const SOURCE: LabelTable = &[
    (1, "Email"),
    (2, "Portal"),
    (3, "Phone"),
    (7, "Chat"),
    (9, "Feedback Widget"),
    (10, "Outbound Email"),
];

/// Ticket `status`
pub const STATUS: LabelTable = &[(2, "Open"), (3, "Pending"), (4, "Resolved"), (5, "Closed")];

/// Ticket `priority`
pub const PRIORITY: LabelTable = &[(1, "Low"), (2, "Medium"), (3, "High"), (4, "Urgent")];

/// Satisfaction rating scale (classic and custom surveys share one table)
pub const RATINGS: LabelTable = &[
    (103, "Extremely Happy"),
    (102, "Very Happy"),
    (101, "Happy"),
    (100, "Neutral"),
    (-101, "Unhappy"),
    (-102, "Very Unhappy"),
    (-103, "Extremely Unhappy"),
    (1, "Happy"),
    (2, "Neutral"),
    (3, "Unhappy"),
];

/// Look up the label for a code
pub fn lookup(table: LabelTable, code: i64) -> Option<&'static str> {
    table.iter().find(|(c, _)| *c == code).map(|(_, label)| *label)
}

/// Decode a raw field value into a label value (`null` when unknown)
pub fn decode(table: LabelTable, value: Option<&JsonValue>) -> JsonValue {
    value
        .and_then(JsonValue::as_i64)
        .and_then(|code| lookup(table, code))
        .map_or(JsonValue::Null, |label| JsonValue::String(label.to_string()))
}

/// Add `{target}` next to `{source}` in a record object
pub fn add_label(record: &mut JsonValue, source: &str, target: &str, table: LabelTable) {
    if let Some(fields) = record.as_object_mut() {
        let label = decode(table, fields.get(source));
        fields.insert(target.to_string(), label);
    }
}
