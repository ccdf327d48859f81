//! Tests for stream definitions

use super::labels::{decode, lookup, PRIORITY, RATINGS, SOURCE, STATUS, TICKET_SCOPE};
use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use test_case::test_case;

// ============================================================================
// Label Tests
// ============================================================================

#[test_case(1, Some("Global Access"); "global")]
#[test_case(2, Some("Group Access"); "group")]
#[test_case(3, Some("Restricted Access"); "restricted")]
#[test_case(4, None; "unknown scope")]
fn test_ticket_scope_labels(code: i64, expected: Option<&str>) {
    assert_eq!(lookup(TICKET_SCOPE, code), expected);
}

#[test_case(1, Some("Email"))]
#[test_case(2, Some("Portal"))]
#[test_case(3, Some("Phone"))]
#[test_case(7, Some("Chat"))]
#[test_case(9, Some("Feedback Widget"))]
#[test_case(10, Some("Outbound Email"))]
#[test_case(4, None)]
fn test_source_labels(code: i64, expected: Option<&str>) {
    assert_eq!(lookup(SOURCE, code), expected);
}

#[test_case(2, Some("Open"))]
#[test_case(3, Some("Pending"))]
#[test_case(4, Some("Resolved"))]
#[test_case(5, Some("Closed"))]
#[test_case(1, None)]
fn test_status_labels(code: i64, expected: Option<&str>) {
    assert_eq!(lookup(STATUS, code), expected);
}

#[test_case(1, Some("Low"))]
#[test_case(4, Some("Urgent"))]
#[test_case(5, None)]
fn test_priority_labels(code: i64, expected: Option<&str>) {
    assert_eq!(lookup(PRIORITY, code), expected);
}

#[test_case(103, Some("Extremely Happy"))]
#[test_case(100, Some("Neutral"))]
#[test_case(-103, Some("Extremely Unhappy"))]
#[test_case(1, Some("Happy"))]
#[test_case(3, Some("Unhappy"))]
#[test_case(0, None)]
fn test_rating_labels(code: i64, expected: Option<&str>) {
    assert_eq!(lookup(RATINGS, code), expected);
}

#[test]
fn test_decode_non_integer_is_null() {
    assert_eq!(decode(STATUS, Some(&json!("2"))), json!(null));
    assert_eq!(decode(STATUS, None), json!(null));
    assert_eq!(decode(STATUS, Some(&json!(2))), json!("Open"));
}

#[test]
fn test_add_label_inserts_null_for_unknown() {
    let mut record = json!({"id": 1, "ticket_scope": 9});
    labels::add_label(&mut record, "ticket_scope", "ticket_label", TICKET_SCOPE);
    assert_eq!(record, json!({"id": 1, "ticket_scope": 9, "ticket_label": null}));
}

// ============================================================================
// Satisfaction Rating Expansion Tests
// ============================================================================

#[test]
fn test_expand_ratings() {
    let questions = HashMap::from([("default_question".to_string(), "How would you rate?".to_string())]);
    let mut record = json!({
        "id": 5,
        "ratings": {"default_question": 103, "question_7": -102}
    });

    expand_ratings(&mut record, &questions);

    assert_eq!(
        record["ratings"],
        json!([
            {
                "question_id": "default_question",
                "question_label": "How would you rate?",
                "rating_id": 103,
                "rating_label": "Extremely Happy"
            },
            {
                "question_id": "question_7",
                "question_label": "",
                "rating_id": -102,
                "rating_label": "Very Unhappy"
            }
        ])
    );
}

#[test]
fn test_expand_ratings_unknown_rating_is_null() {
    let mut record = json!({"ratings": {"q": 42}});
    expand_ratings(&mut record, &HashMap::new());
    assert_eq!(record["ratings"][0]["rating_label"], json!(null));
    assert_eq!(record["ratings"][0]["question_label"], json!(""));
}

#[test]
fn test_expand_ratings_leaves_records_without_ratings() {
    let mut record = json!({"id": 1});
    expand_ratings(&mut record, &HashMap::new());
    assert_eq!(record, json!({"id": 1}));

    let mut empty = json!({"id": 2, "ratings": {}});
    expand_ratings(&mut empty, &HashMap::new());
    assert_eq!(empty["ratings"], json!([]));
}

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_all_streams_registered() {
    let ids: Vec<&str> = all_streams().iter().map(|s| s.stream_id()).collect();
    assert_eq!(
        ids,
        vec![
            "agents",
            "companies",
            "contacts",
            "groups",
            "roles",
            "tickets",
            "conversations",
            "satisfaction_ratings",
            "time_entries",
        ]
    );
}

#[test]
fn test_stream_for() {
    assert!(stream_for("tickets").is_some());
    assert!(stream_for("widgets").is_none());
}

#[test_case("agents", ReplicationMethod::FullTable, &[], None)]
#[test_case("companies", ReplicationMethod::FullTable, &[], Some("company_fields"))]
#[test_case("contacts", ReplicationMethod::Incremental, &["updated_at"], Some("contact_fields"))]
#[test_case("tickets", ReplicationMethod::Incremental, &["updated_at"], Some("ticket_fields"))]
#[test_case("conversations", ReplicationMethod::FullTable, &[], None)]
#[test_case("satisfaction_ratings", ReplicationMethod::Incremental, &["created_at"], None)]
#[test_case("time_entries", ReplicationMethod::FullTable, &[], None)]
fn test_stream_capabilities(
    stream_id: &str,
    method: ReplicationMethod,
    keys: &[&str],
    custom_fields: Option<&str>,
) {
    let stream = stream_for(stream_id).unwrap();
    assert_eq!(stream.replication_method(), method);
    assert_eq!(stream.replication_keys(), keys);
    assert_eq!(stream.custom_fields_endpoint(), custom_fields);
    assert_eq!(stream.key_properties(), &["id"]);
}

#[test]
fn test_ticket_filters() {
    assert_eq!(
        TICKET_FILTERS,
        [("", "tickets"), ("deleted", "deleted_tickets"), ("spam", "spam_tickets")]
    );
}
