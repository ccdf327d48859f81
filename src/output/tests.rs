//! Tests for output module

use super::*;
use crate::engine::Message;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn lines(bytes: &[u8]) -> Vec<Value> {
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_json_lines_writer_formats_messages() {
    let mut writer = JsonLinesWriter::new(Vec::new());

    writer
        .write_message(&Message::schema(
            "agents",
            json!({"type": "object"}),
            vec!["id".to_string()],
            vec![],
        ))
        .unwrap();
    writer
        .write_message(&Message::Record {
            stream: "agents".to_string(),
            record: json!({"id": 1}),
            time_extracted: None,
        })
        .unwrap();
    writer
        .write_message(&Message::state(json!({"contacts": "2024-01-01T00:00:01Z"})))
        .unwrap();

    assert_eq!(writer.messages_written(), 3);
    let output = lines(&writer.into_inner());

    assert_eq!(
        output,
        vec![
            json!({"type": "SCHEMA", "stream": "agents", "schema": {"type": "object"}, "key_properties": ["id"]}),
            json!({"type": "RECORD", "stream": "agents", "record": {"id": 1}}),
            json!({"type": "STATE", "value": {"contacts": "2024-01-01T00:00:01Z"}}),
        ]
    );
}

#[test]
fn test_schema_message_includes_bookmark_properties() {
    let mut writer = JsonLinesWriter::new(Vec::new());
    writer
        .write_message(&Message::schema(
            "tickets",
            json!({}),
            vec!["id".to_string()],
            vec!["updated_at".to_string()],
        ))
        .unwrap();

    let output = lines(&writer.into_inner());
    assert_eq!(output[0]["bookmark_properties"], json!(["updated_at"]));
}

#[test]
fn test_record_message_carries_time_extracted() {
    let mut writer = JsonLinesWriter::new(Vec::new());
    writer
        .write_message(&Message::record("roles", json!({"id": 3})))
        .unwrap();

    let output = lines(&writer.into_inner());
    assert!(output[0]["time_extracted"].is_string());
}

#[test]
fn test_memory_sink_accessors() {
    let mut sink = MemorySink::new();
    sink.write_message(&Message::schema("groups", json!({}), vec![], vec![]))
        .unwrap();
    sink.write_message(&Message::record("groups", json!({"id": 1})))
        .unwrap();
    sink.write_message(&Message::record("roles", json!({"id": 2})))
        .unwrap();
    sink.write_message(&Message::state(json!({}))).unwrap();

    assert_eq!(sink.messages().len(), 4);
    assert_eq!(sink.records("groups"), vec![&json!({"id": 1})]);
    assert_eq!(sink.states(), vec![&json!({})]);
    assert_eq!(sink.schema_streams(), vec!["groups"]);
}
